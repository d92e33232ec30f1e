use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Name printed on the message bubble.
    pub fn label(&self, username: &str) -> String {
        match self {
            Role::User => {
                if username.is_empty() {
                    return "You".to_string();
                }
                return username.to_string();
            }
            Role::Assistant => return "Assistant".to_string(),
        }
    }
}
