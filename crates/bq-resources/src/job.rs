#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<S>,
    pub job_id: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<S>,
}

