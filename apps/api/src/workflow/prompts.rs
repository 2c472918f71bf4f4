// Prompts for job-description structuring.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const JD_STRUCTURE_SYSTEM: &str = "You are a job description analyzer. \
    Extract structured data from job descriptions and return it as JSON.";

const JD_SCHEMA: &str = r#"{
  "title": "job title",
  "company": "company name",
  "location": "location",
  "salary": "$XXk - $XXk or description",
  "requirements": ["requirement 1", "requirement 2"],
  "responsibilities": ["responsibility 1"],
  "skills": ["skill 1", "skill 2"],
  "technologies": ["tech 1", "tech 2"],
  "tools": ["tool 1", "tool 2"],
  "qualifications": ["qualification 1"]
}"#;

/// User message: the schema followed by the pasted description.
pub fn build_jd_structure_prompt(job_description: &str) -> String {
    format!(
        "Extract the following information from this job description and {JSON_ONLY_INSTRUCTION}:\n\
         {JD_SCHEMA}\n\n\
         Job Description:\n\
         {job_description}"
    )
}
