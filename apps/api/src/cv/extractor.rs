//! CV extractor. Turns raw CV text into a year-sorted `CvExtraction`.

use tracing::info;

use crate::cv::models::CvExtraction;
use crate::cv::prompts::{build_cv_extract_prompt, CV_EXTRACT_ROLE};
use crate::errors::AppError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;

/// Extracts structured CV data with the LLM and sorts time-based sections latest-first.
pub async fn extract_cv_data(cv_text: &str, llm: &LlmClient) -> Result<CvExtraction, AppError> {
    let prompt = build_cv_extract_prompt(cv_text);
    let mut cv: CvExtraction = llm
        .call_json(&prompt, &system_prompt(CV_EXTRACT_ROLE))
        .await
        .map_err(AppError::llm("CV extraction"))?;

    cv.sort_by_year();
    info!(
        "CV extracted: {} education, {} experience, {} skills",
        cv.education.len(),
        cv.experience.len(),
        cv.skills.len()
    );
    Ok(cv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::decode_json;

    /// Shape of a typical model reply, including an unsorted section and a missing field.
    const MODEL_REPLY: &str = r#"```json
    {
        "name": "Amara Okafor",
        "email": "amara.okafor@mailbox.org",
        "phone": null,
        "education": ["BSc CS, Leeds, 2016-2019", "MSc ML, UCL, 2020-2021"],
        "experience": ["Intern at Northwind, 2018", "ML Engineer at Contoso, 2021-2024"],
        "skills": ["Rust", "PyTorch"],
        "projects": [],
        "awards": [],
        "publications": ["Ranking at scale, RecSys 2023"],
        "summary": ""
    }
    ```"#;

    #[test]
    fn test_model_reply_decodes_and_sorts() {
        let mut cv: CvExtraction = decode_json(MODEL_REPLY).unwrap();
        assert!(cv.volunteer.is_empty());
        cv.sort_by_year();
        assert_eq!(cv.education[0], "MSc ML, UCL, 2020-2021");
        assert_eq!(cv.experience[0], "ML Engineer at Contoso, 2021-2024");
        assert!(cv.validate().passed);
    }

    #[tokio::test]
    async fn test_unreachable_provider_surfaces_llm_error() {
        let llm = LlmClient::new(
            "key".to_string(),
            "http://127.0.0.1:9/v1/chat/completions".to_string(),
            "llama-3.3-70b-versatile".to_string(),
            0.1,
        )
        .unwrap();
        let err = extract_cv_data("Amara Okafor", &llm).await.unwrap_err();
        assert!(matches!(err, AppError::Llm { context: "CV extraction", .. }));
    }
}
