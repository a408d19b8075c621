use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One entry extracted from a `username:password:email:password` line.
///
/// Always carries all four fields; anything the line did not provide is an
/// empty string. Serializes with the CSV header labels as keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub secondary1: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password2")]
    pub secondary2: String,
}

impl Record {
    pub fn new(
        username: impl Into<String>,
        secondary1: impl Into<String>,
        email: impl Into<String>,
        secondary2: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            secondary1: secondary1.into(),
            email: email.into(),
            secondary2: secondary2.into(),
        }
    }

    /// Fields in column order.
    pub fn fields(&self) -> [&str; 4] {
        [
            &self.username,
            &self.secondary1,
            &self.email,
            &self.secondary2,
        ]
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Secondary1 => &self.secondary1,
            Field::Email => &self.email,
            Field::Secondary2 => &self.secondary2,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Field {
    Username,
    Secondary1,
    Email,
    Secondary2,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Field::Username,
            Field::Secondary1,
            Field::Email,
            Field::Secondary2,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Field::Username => 0,
            Field::Secondary1 => 1,
            Field::Email => 2,
            Field::Secondary2 => 3,
        }
    }

    /// Column name used in the exported CSV header.
    pub fn csv_label(&self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Secondary1 => "Password",
            Field::Email => "Email",
            Field::Secondary2 => "Password2",
        }
    }

    /// Column name shown in the table view.
    pub fn display_label(&self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Secondary1 => "Password",
            Field::Email => "Email",
            Field::Secondary2 => "Password 2",
        }
    }

    pub fn copied_notice(&self) -> String {
        format!("{} copied.", self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" | "user" => Ok(Field::Username),
            "password" | "password1" | "secondary1" => Ok(Field::Secondary1),
            "email" => Ok(Field::Email),
            "password2" | "secondary2" => Ok(Field::Secondary2),
            other => anyhow::bail!(
                "Unknown field '{}'. Expected one of: username, password, email, password2",
                other
            ),
        }
    }
}
