//! The state machine behind the create and edit transaction forms.

use serde::Deserialize;

use crate::{
    Error,
    session::Session,
    transaction::{
        core::{Transaction, TransactionId, TransactionType},
        store::TransactionWriter,
    },
};

/// The raw values typed into the transaction form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionFormFields {
    /// What the transaction was for.
    pub title: String,
    /// The amount as typed, parsed during validation.
    pub amount: String,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// Optional category.
    pub category: String,
    /// The date as `YYYY-MM-DD`.
    pub date: String,
}

impl TransactionFormFields {
    /// Fields for a new transaction.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Fields pre-populated from an existing transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            title: transaction.title.clone(),
            amount: format!("{:.2}", transaction.amount),
            type_: transaction.type_,
            category: transaction.category.clone().unwrap_or_default(),
            date: transaction.date.clone().unwrap_or_default(),
        }
    }

    /// Check the fields and normalise them.
    ///
    /// Text is trimmed and a blank category becomes `None`. The first failing
    /// check is reported.
    pub fn validate(&self) -> Result<ValidatedFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or(ValidationError::InvalidAmount)?;

        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::DateRequired);
        }

        let category = self.category.trim();

        Ok(ValidatedFields {
            title: title.to_owned(),
            amount,
            type_: self.type_,
            category: (!category.is_empty()).then(|| category.to_owned()),
            date: date.to_owned(),
        })
    }
}

/// Form fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    title: String,
    amount: f64,
    type_: TransactionType,
    category: Option<String>,
    date: String,
}

impl ValidatedFields {
    fn merge_into(self, mut original: Transaction) -> Transaction {
        original.title = self.title;
        original.amount = self.amount;
        original.type_ = self.type_;
        original.category = self.category;
        original.date = Some(self.date);
        original
    }
}

/// Why the transaction form was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The title was empty.
    #[error("Title is required.")]
    TitleRequired,
    /// The amount was not a number greater than zero.
    #[error("Please enter a valid amount greater than 0.")]
    InvalidAmount,
    /// The date was empty.
    #[error("Date is required.")]
    DateRequired,
}

/// Whether the form is open and what it is editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormState {
    /// Not shown.
    #[default]
    Closed,
    /// Creating a new transaction.
    Creating,
    /// Editing an existing transaction.
    Editing(Transaction),
}

/// What a successful submission wrote.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A new transaction was inserted under this key.
    Created(TransactionId),
    /// The transaction with this key was updated.
    Updated(TransactionId),
}

/// Drives a transaction form from opening to a single write.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    state: FormState,
    fields: TransactionFormFields,
    error: Option<ValidationError>,
}

impl FormController {
    /// A controller with the form closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the form with blank fields for a new transaction.
    pub fn open_create(&mut self) {
        self.state = FormState::Creating;
        self.fields = TransactionFormFields::blank();
        self.error = None;
    }

    /// Open the form for `transaction` with its values filled in.
    pub fn open_edit(&mut self, transaction: Transaction) {
        self.fields = TransactionFormFields::from_transaction(&transaction);
        self.state = FormState::Editing(transaction);
        self.error = None;
    }

    /// Close the form, discarding any edits.
    pub fn cancel(&mut self) {
        self.close();
    }

    /// Replace the field values with what the user typed.
    pub fn set_fields(&mut self, fields: TransactionFormFields) {
        self.fields = fields;
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn fields(&self) -> &TransactionFormFields {
        &self.fields
    }

    /// The validation message from the last rejected submission.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Validate the fields and write the result with exactly one call to
    /// `writer`.
    ///
    /// New transactions are owned by the user in `session` and stamped with
    /// `created_at`. Edits are merged over the original record, so its owner,
    /// creation time and notes are kept. The form closes after the write.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::FormClosed] if the form is not open,
    /// - [Error::InvalidTransaction] if validation fails, in which case the
    ///   form stays open and [FormController::error] holds the message,
    /// - or the writer's error if the write fails, in which case the form
    ///   stays open.
    pub fn submit(
        &mut self,
        session: &Session,
        created_at: i64,
        writer: &impl TransactionWriter,
    ) -> Result<SubmitOutcome, Error> {
        if self.state == FormState::Closed {
            return Err(Error::FormClosed);
        }

        let validated = match self.fields.validate() {
            Ok(validated) => validated,
            Err(error) => {
                self.error = Some(error.clone());
                return Err(error.into());
            }
        };
        self.error = None;

        let outcome = match &self.state {
            FormState::Closed => return Err(Error::FormClosed),
            FormState::Creating => {
                let builder = Transaction::build(
                    &validated.title,
                    validated.amount,
                    validated.type_,
                    &validated.date,
                    session.user_id.clone(),
                )
                .category(validated.category)
                .created_at(created_at);

                SubmitOutcome::Created(writer.create(builder)?)
            }
            FormState::Editing(original) => {
                let updated = validated.merge_into(original.clone());
                writer.update(&updated)?;

                SubmitOutcome::Updated(updated.id)
            }
        };

        self.close();

        Ok(outcome)
    }

    fn close(&mut self) {
        self.state = FormState::Closed;
        self.fields = TransactionFormFields::blank();
        self.error = None;
    }
}
