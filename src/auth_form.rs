//! Login/signup form state as the web client tracks it.
//!
//! Every field holds its value, whether the user has left it at least once
//! (`touched`), and the last computed error. Errors are recomputed on change
//! only for touched fields and always on blur. The rules are the ones the
//! server enforces, except that the phone number is required here.

use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    RoleName,
    PhoneNumber,
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::FullName,
        Field::RoleName,
        Field::PhoneNumber,
        Field::Username,
        Field::Email,
        Field::Password,
        Field::ConfirmPassword,
    ];

    /// Form key sent to the server.
    pub fn key(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::RoleName => "roleName",
            Field::PhoneNumber => "phoneNumber",
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmpassword",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    mode: AuthMode,
    fields: [FieldState; 7],
    focused: Option<Field>,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            fields: Default::default(),
            focused: None,
        }
    }

    pub fn required_fields(&self) -> &'static [Field] {
        match self.mode {
            AuthMode::Login => &[Field::Username, Field::Password],
            AuthMode::Signup => &Field::ALL,
        }
    }

    pub fn field(&self, field: Field) -> &FieldState {
        &self.fields[field.index()]
    }

    fn rule(&self, field: Field, value: &str) -> Option<String> {
        match field {
            Field::FullName => validation::full_name(value),
            Field::RoleName => validation::role_name(value),
            Field::PhoneNumber => validation::phone(value),
            Field::Username => validation::username(value),
            Field::Email => validation::email(value),
            Field::Password => validation::password(value),
            Field::ConfirmPassword => {
                validation::confirm_password(value, &self.field(Field::Password).value)
            }
        }
    }

    fn revalidate(&mut self, field: Field) {
        let error = self.rule(field, &self.field(field).value);
        self.fields[field.index()].error = error;
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        self.fields[field.index()].value = value.into();
        if self.field(field).touched {
            self.revalidate(field);
        }
    }

    pub fn focus(&mut self, field: Field) {
        self.focused = Some(field);
    }

    pub fn blur(&mut self, field: Field) {
        if self.focused == Some(field) {
            self.focused = None;
        }
        self.fields[field.index()].touched = true;
        self.revalidate(field);
    }

    /// The label floats above the input while focused or non-empty.
    pub fn is_label_floating(&self, field: Field) -> bool {
        self.focused == Some(field) || !self.field(field).value.is_empty()
    }

    /// Error shown to the user; hidden until the field has been touched.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        let state = self.field(field);
        if state.touched {
            state.error.as_deref()
        } else {
            None
        }
    }

    /// Submit is enabled only when every required field is filled and valid.
    pub fn can_submit(&self) -> bool {
        self.required_fields().iter().all(|&f| {
            let value = &self.field(f).value;
            !value.trim().is_empty() && self.rule(f, value).is_none()
        })
    }

    /// Validate and touch every required field. On success returns the
    /// key/value pairs to post.
    pub fn submit(&mut self) -> Result<Vec<(&'static str, String)>, Vec<Field>> {
        let required = self.required_fields();
        for &f in required {
            self.fields[f.index()].touched = true;
            self.revalidate(f);
        }
        let failed: Vec<Field> = required
            .iter()
            .copied()
            .filter(|&f| self.field(f).error.is_some())
            .collect();
        if !failed.is_empty() {
            return Err(failed);
        }
        Ok(required
            .iter()
            .map(|&f| (f.key(), self.field(f).value.clone()))
            .collect())
    }
}
