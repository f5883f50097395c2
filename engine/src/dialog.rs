//! Dialog state for adding, editing and deleting a city.
//!
//! The dialog never talks to the remote collection. Submitting it yields a
//! [`DialogOutcome`] for the host to act on, after which the dialog is
//! dismissed.

use crate::{error::Result, validate_document_id, City, Error};

/// Whether the dialog creates a new city or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(City),
}

/// The single intent a dialog reports to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Add(City),
    Update {
        city: City,
        new_name: String,
        new_province: String,
    },
    Delete(City),
}

/// An open add/edit dialog.
#[derive(Debug, Clone)]
pub struct CityDialog {
    mode: DialogMode,
    name: String,
    province: String,
    dismissed: bool,
}

impl CityDialog {
    /// Dialog for adding a city, with empty fields.
    pub fn create() -> Self {
        Self {
            mode: DialogMode::Create,
            name: String::new(),
            province: String::new(),
            dismissed: false,
        }
    }

    /// Dialog for editing `city`, fields pre-filled with its values.
    pub fn edit(city: City) -> Self {
        Self {
            name: city.name.clone(),
            province: city.province.clone(),
            mode: DialogMode::Edit(city),
            dismissed: false,
        }
    }

    /// Open the dialog for an optional existing city.
    pub fn for_city(city: Option<City>) -> Self {
        match city {
            Some(city) => Self::edit(city),
            None => Self::create(),
        }
    }

    pub fn mode(&self) -> &DialogMode {
        &self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Whether the delete action is offered.
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_province(&mut self, province: impl Into<String>) {
        self.province = province.into();
    }

    /// Submit the entered values.
    ///
    /// Surrounding whitespace is trimmed. A name that cannot be a document id
    /// keeps the dialog open and returns the validation error.
    pub fn submit(&mut self) -> Result<DialogOutcome> {
        self.ensure_open()?;

        let name = self.name.trim().to_string();
        let province = self.province.trim().to_string();
        validate_document_id(&name)?;

        let outcome = match &self.mode {
            DialogMode::Create => DialogOutcome::Add(City::new(name, province)),
            DialogMode::Edit(city) => DialogOutcome::Update {
                city: city.clone(),
                new_name: name,
                new_province: province,
            },
        };

        self.dismissed = true;
        Ok(outcome)
    }

    /// Delete the city being edited.
    pub fn delete(&mut self) -> Result<DialogOutcome> {
        self.ensure_open()?;

        match &self.mode {
            DialogMode::Edit(city) => {
                let outcome = DialogOutcome::Delete(city.clone());
                self.dismissed = true;
                Ok(outcome)
            }
            DialogMode::Create => Err(Error::DeleteInCreateMode),
        }
    }

    /// Close without reporting anything.
    pub fn cancel(&mut self) {
        self.dismissed = true;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.dismissed {
            Err(Error::DialogDismissed)
        } else {
            Ok(())
        }
    }
}
