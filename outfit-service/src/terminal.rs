//! Interactive session on stdin/stdout.

use anyhow::{Context, bail};
use outfit_flow::{ExecutionStatus, FlowError, FlowRunner, OutfitRequest};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

pub async fn run_chat(runner: FlowRunner, locations: Vec<&'static str>, max_attempts: u32) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();
    run_chat_with(runner, &locations, max_attempts, input, output).await
}

/// Drive one session over arbitrary input and output streams.
pub async fn run_chat_with<R, W>(
    runner: FlowRunner,
    locations: &[&str],
    max_attempts: u32,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(b"Welcome to the outfit recommender!\n").await?;
    if !locations.is_empty() {
        let known = locations.join(", ");
        output.write_all(format!("Known locations: {known}\n").as_bytes()).await?;
    }

    let request = OutfitRequest {
        height: ask(&mut lines, &mut output, "Height (e.g. 5'10\")").await?,
        gender: ask(&mut lines, &mut output, "Gender").await?,
        location: ask(&mut lines, &mut output, "Location").await?,
        occasion: ask(&mut lines, &mut output, "Occasion").await?,
        mood: ask(&mut lines, &mut output, "Mood").await?,
    };

    let (session_id, mut result) = runner
        .start(request, max_attempts)
        .await
        .context("failed to start session")?;

    while result.status == ExecutionStatus::WaitingForInput {
        let session = runner.session(&session_id).await?;
        let recommendation = result.response.unwrap_or_default();
        output
            .write_all(
                format!(
                    "\nRecommendation {} of {}:\n{recommendation}\n",
                    session.state.attempts, session.state.max_attempts
                )
                .as_bytes(),
            )
            .await?;

        result = loop {
            let answer = ask(&mut lines, &mut output, "Rate this outfit (1-10)").await?;
            let Ok(rating) = answer.parse::<i64>() else {
                output.write_all(b"Please enter a whole number.\n").await?;
                continue;
            };
            match runner.submit_rating(&session_id, rating).await {
                Ok(result) => break result,
                Err(e @ FlowError::InvalidRating(_)) => {
                    output.write_all(format!("{e}\n").as_bytes()).await?;
                }
                Err(e) => return Err(e.into()),
            }
        };
    }

    let session = runner.session(&session_id).await?;
    let message = result.response.unwrap_or_default();
    output
        .write_all(format!("\n{message}\n\nLog:\n{}\n", session.state.log.join("\n")).as_bytes())
        .await?;
    output.flush().await?;
    Ok(())
}

/// Prompt until a non-blank line arrives.
async fn ask<R, W>(lines: &mut Lines<R>, output: &mut W, label: &str) -> anyhow::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        output.write_all(format!("{label}: ").as_bytes()).await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            bail!("input closed");
        };
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use outfit_flow::{InMemorySessionStorage, StaticWeather, TextCompletion, Workflow};
    use std::sync::Arc;

    struct FixedStylist;

    #[async_trait]
    impl TextCompletion for FixedStylist {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok("Navy blazer over a white tee".to_string())
        }
    }

    fn runner() -> FlowRunner {
        let workflow = Workflow::standard(Arc::new(StaticWeather::default()), Arc::new(FixedStylist)).unwrap();
        FlowRunner::new(Arc::new(workflow), Arc::new(InMemorySessionStorage::new()))
    }

    #[tokio::test]
    async fn chat_runs_until_accepted() {
        let input: &[u8] = b"5'10\"\nMale\nMumbai\n\nParty\nConfident\nabc\n12\n3\n8\n";
        let mut output = Vec::new();

        run_chat_with(runner(), &["Mumbai"], 5, input, &mut output).await.unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Known locations: Mumbai"));
        assert!(printed.contains("Recommendation 1 of 5:\nNavy blazer over a white tee"));
        assert!(printed.contains("Please enter a whole number."));
        assert!(printed.contains("Rating must be between 1 and 10, got 12"));
        assert!(printed.contains("Recommendation 2 of 5:"));
        assert!(printed.contains("Perfect outfit found after 2 attempt(s)!"));
        assert!(printed.contains("Node: get_weather - Location: Mumbai"));
    }

    #[tokio::test]
    async fn closed_input_is_an_error() {
        let input: &[u8] = b"5'10\"\nMale\n";
        let err = run_chat_with(runner(), &[], 5, input, Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
