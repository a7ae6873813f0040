use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use uuid::Uuid;

use survey_cli::model::{Answer, Response};
use survey_cli::store::Store;

use super::Workspace;

/// Parse `QUESTIONING_ID` or `QUESTIONING_ID=OPTION_ID`
fn parse_answer(raw: &str) -> Result<(Uuid, Option<Uuid>)> {
    let (qing, option) = match raw.split_once('=') {
        Some((qing, option)) => (qing, Some(option)),
        None => (raw, None),
    };
    let qing_id = Uuid::parse_str(qing.trim()).with_context(|| format!("Invalid questioning ID in '{}'", raw))?;
    let option_id = option
        .map(|o| Uuid::parse_str(o.trim()).with_context(|| format!("Invalid option ID in '{}'", raw)))
        .transpose()?;
    Ok((qing_id, option_id))
}

/// Record a response to a form
pub fn add_command(store: Option<PathBuf>, form_id: Uuid, answers: Vec<String>) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    workspace.store.form(form_id)?;

    let response = Response { id: Uuid::new_v4(), form_id };
    for raw in &answers {
        let (questioning_id, option_id) = parse_answer(raw)?;
        let qing = workspace.store.questioning(questioning_id)?;
        if qing.form_id != form_id {
            anyhow::bail!("Questioning {} is not on form {}", questioning_id, form_id);
        }
        workspace.store.insert_answer(Answer {
            id: Uuid::new_v4(),
            response_id: response.id,
            questioning_id,
            option_id,
            value: None,
        });
    }
    workspace.store.insert_response(response.clone());
    workspace.save()?;

    info!("Recorded response {} with {} answers", response.id, answers.len());
    println!("Recorded response {} ({} answers)", response.id, answers.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        let qing = Uuid::new_v4();
        let option = Uuid::new_v4();

        assert_eq!(parse_answer(&qing.to_string()).unwrap(), (qing, None));
        assert_eq!(parse_answer(&format!("{}={}", qing, option)).unwrap(), (qing, Some(option)));
        assert!(parse_answer("not-a-uuid").is_err());
    }
}
