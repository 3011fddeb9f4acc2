use anyhow::{Result, bail};
use clap::Parser;
use reqwest::{Client, Response};
use serde_json::{Value, json};

/// Walks a running backend through one complete survey.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(default_value = "http://localhost:3001")]
    base_url: String,
}

async fn report(step: &str, response: Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await?;

    println!("{step}: {status} {body}");

    if !status.is_success() {
        bail!("{step} failed with {status}");
    }

    Ok(body)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = Client::new();
    let url = |path: &str| format!("{}/api/{path}", args.base_url.trim_end_matches('/'));

    let answers = [
        (
            "goals",
            json!({ "selectedGoals": ["Drink less", "Save money", "Sleep better"] }),
        ),
        ("primary-goal", json!({ "primaryGoal": "Save money" })),
        (
            "save-drinks",
            json!({
                "Monday": 0, "Tuesday": 2, "Wednesday": 0, "Thursday": 1,
                "Friday": 4, "Saturday": 5, "Sunday": 0,
            }),
        ),
        ("save-ideal-outcome", json!({ "idealOutcomeId": 2 })),
        ("save-spend", json!({ "spendPerDrink": 6.5 })),
        (
            "save-alcohol-frequency",
            json!({ "alcoholEffectFrequency": "Sometimes" }),
        ),
        ("save-alcohol-concern", json!({ "alcoholConcernLevel": 3 })),
        (
            "save-alcohol-improvement-areas",
            json!({ "selectedAreas": ["Sleep", "Mood"] }),
        ),
    ];

    for (path, answer) in answers {
        let response = client.post(url(path)).json(&answer).send().await?;
        report(path, response).await?;
    }

    for path in [
        "drinks-per-day",
        "get-ideal-outcome",
        "total-drinks",
        "weekly-spend",
        "user-selections",
    ] {
        let response = client.get(url(path)).send().await?;
        report(path, response).await?;
    }

    Ok(())
}
