use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl CommentId {
    /// Identifier carried by a form that has not been created remotely yet.
    /// Never present in a reconciled collection.
    pub const NEW: CommentId = CommentId(0);

    pub fn is_new(self) -> bool {
        self == Self::NEW
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(CommentId)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Comment {
    pub fn draft(
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: CommentId::NEW,
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }

    pub fn with_id(mut self, id: CommentId) -> Self {
        self.id = id;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_new()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Body => &self.body,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Body => &mut self.body,
        };
        *slot = value.into();
    }

    /// Presence check only; the contents of each field are not inspected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in FormField::ALL {
            if self.field(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Body,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Body];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Body => "body",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(CommentId),
}

impl FormMode {
    pub fn of(form: &Comment) -> Self {
        if form.is_new() {
            FormMode::Create
        } else {
            FormMode::Update(form.id)
        }
    }

    pub fn action_label(self) -> &'static str {
        match self {
            FormMode::Create => "Add Comment",
            FormMode::Update(_) => "Update Comment",
        }
    }
}
