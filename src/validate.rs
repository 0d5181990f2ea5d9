use regex::Regex;

use crate::error::{Error, Result};

const LIST_NAME_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9_-]{0,25}$";
const STRING_ID_PATTERN: &str = r"^[0-9]+$";

/// Attribute validators, compiled once when the owning manager is built.
#[derive(Debug, Clone)]
pub struct Validators {
    list_name: Regex,
    string_id: Regex,
}

impl Validators {
    pub fn new() -> Self {
        Self {
            list_name: Regex::new(LIST_NAME_PATTERN).expect("list name pattern compiles"),
            string_id: Regex::new(STRING_ID_PATTERN).expect("string id pattern compiles"),
        }
    }

    pub fn list_name(&self, name: &str) -> Result<()> {
        if self.list_name.is_match(name) {
            return Ok(());
        }
        Err(Error::Validation {
            field: "name",
            value: name.to_owned(),
            reason: r#"must start with a letter and can consist only of 25 or fewer letters, numbers, "-", or "_" characters"#,
        })
    }

    /// Ids travel as strings; this checks the string and parses it.
    pub fn string_id(&self, id: &str) -> Result<i64> {
        let invalid = || Error::Validation { field: "id", value: id.to_owned(), reason: "must be an integer" };
        if !self.string_id.is_match(id) {
            return Err(invalid());
        }
        id.parse::<i64>().map_err(|_| invalid())
    }
}

impl Default for Validators {
    fn default() -> Self {
        Self::new()
    }
}
