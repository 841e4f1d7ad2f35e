use serde::{Deserialize, Serialize};

/// The card shown on the dashboard.
///
/// This is display text only, there are no payment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    /// The cardholder's name.
    pub name: String,
    /// The last four digits of the card number.
    pub last_four: String,
    /// The expiry as typed, e.g. "12/28".
    pub expiry: String,
}

impl Default for CardInfo {
    fn default() -> Self {
        Self {
            name: "James Smith".to_owned(),
            last_four: "5491".to_owned(),
            expiry: "12/28".to_owned(),
        }
    }
}

/// The card form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardForm {
    pub name: String,
    pub last_four: String,
    pub expiry: String,
}

impl CardForm {
    pub fn from_card(card: &CardInfo) -> Self {
        Self {
            name: card.name.clone(),
            last_four: card.last_four.clone(),
            expiry: card.expiry.clone(),
        }
    }

    /// Trim the fields and check that they are filled in.
    pub fn validate(&self) -> Result<CardInfo, CardValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CardValidationError::NameRequired);
        }

        let last_four = self.last_four.trim();
        if last_four.len() != 4 || !last_four.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(CardValidationError::InvalidLastFour);
        }

        let expiry = self.expiry.trim();
        if expiry.is_empty() {
            return Err(CardValidationError::ExpiryRequired);
        }

        Ok(CardInfo {
            name: name.to_owned(),
            last_four: last_four.to_owned(),
            expiry: expiry.to_owned(),
        })
    }
}

/// Why the card form was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CardValidationError {
    #[error("Cardholder name is required.")]
    NameRequired,
    #[error("Last four digits must be exactly 4 numbers.")]
    InvalidLastFour,
    #[error("Expiry is required.")]
    ExpiryRequired,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CardForm, CardInfo, CardValidationError};

    fn form(name: &str, last_four: &str, expiry: &str) -> CardForm {
        CardForm {
            name: name.to_owned(),
            last_four: last_four.to_owned(),
            expiry: expiry.to_owned(),
        }
    }

    #[test]
    fn valid_form_is_trimmed() {
        let card = form(" Ada Lovelace ", "1234", " 01/30").validate();

        assert_eq!(
            card,
            Ok(CardInfo {
                name: "Ada Lovelace".to_owned(),
                last_four: "1234".to_owned(),
                expiry: "01/30".to_owned(),
            })
        );
    }

    #[test]
    fn rejects_bad_last_four() {
        for last_four in ["", "123", "12345", "12a4", "١٢٣٤"] {
            assert_eq!(
                form("Ada", last_four, "01/30").validate(),
                Err(CardValidationError::InvalidLastFour),
                "{last_four:?} should be rejected"
            );
        }
    }

    #[test]
    fn first_missing_field_wins() {
        assert_eq!(
            form("", "", "").validate(),
            Err(CardValidationError::NameRequired)
        );
        assert_eq!(
            form("Ada", "1234", "  ").validate(),
            Err(CardValidationError::ExpiryRequired)
        );
    }

    #[test]
    fn serializes_with_camel_case() {
        let value = serde_json::to_value(CardInfo::default()).unwrap();

        assert_eq!(
            value,
            json!({"name": "James Smith", "lastFour": "5491", "expiry": "12/28"})
        );
    }
}
