use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Account-level role. Corresponds to the `account_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// A person offering production or acting work.
    Talent,
    /// A professional posting projects.
    Client,
    /// A moderator.
    Admin,
}

string_enum!(AccountRole, "account role", {
    Talent => "talent",
    Client => "client",
    Admin => "admin",
});

/// Why the account was registered. Corresponds to the `account_purpose` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "account_purpose", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[default]
    Talent,
    Professional,
}

string_enum!(Purpose, "purpose", {
    Talent => "talent",
    Professional => "professional",
});

impl Purpose {
    /// Account role granted to a fresh registration with this purpose.
    pub fn default_role(&self) -> AccountRole {
        match self {
            Purpose::Talent => AccountRole::Talent,
            Purpose::Professional => AccountRole::Client,
        }
    }
}

/// Discipline of a talent. Corresponds to the `talent_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "talent_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TalentRole {
    Production,
    Acting,
}

string_enum!(TalentRole, "talent role", {
    Production => "production",
    Acting => "acting",
});

/// A registered account as stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: AccountRole,
    pub purpose: Purpose,
    pub talent_role: Option<TalentRole>,
    pub category: Option<String>,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub location: Option<String>,
    pub has_disability: bool,
    pub disability_type: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub company_name: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates an account with empty profile fields. Emails are stored lower-cased.
    pub fn new(
        name: &str,
        email: &str,
        password_hash: String,
        role: AccountRole,
        purpose: Purpose,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            phone: None,
            role,
            purpose,
            talent_role: None,
            category: None,
            experience: None,
            skills: Vec::new(),
            languages: Vec::new(),
            location: None,
            has_disability: false,
            disability_type: None,
            bio: None,
            profile_picture: None,
            company_name: None,
            is_verified: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account appears in the public talent directory.
    pub fn is_listed_talent(&self) -> bool {
        self.role == AccountRole::Talent && self.purpose == Purpose::Talent && self.is_active
    }

    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }

    /// Applies the fields present in `update`, leaving the others untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            self.phone = non_empty(phone);
        }
        if let Some(talent_role) = update.talent_role {
            self.talent_role = Some(talent_role);
        }
        if let Some(category) = update.category {
            self.category = non_empty(category);
        }
        if let Some(experience) = update.experience {
            self.experience = non_empty(experience);
        }
        if let Some(skills) = update.skills {
            self.skills = clean_list(skills);
        }
        if let Some(languages) = update.languages {
            self.languages = clean_list(languages);
        }
        if let Some(location) = update.location {
            self.location = non_empty(location);
        }
        if let Some(has_disability) = update.has_disability {
            self.has_disability = has_disability;
        }
        if let Some(disability_type) = update.disability_type {
            self.disability_type = non_empty(disability_type);
        }
        if let Some(bio) = update.bio {
            self.bio = non_empty(bio);
        }
        if let Some(company_name) = update.company_name {
            self.company_name = non_empty(company_name);
        }
        if let Some(profile_picture) = update.profile_picture {
            self.profile_picture = non_empty(profile_picture);
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn talent_view(&self) -> TalentView {
        TalentView {
            id: self.id,
            name: self.name.clone(),
            role: self.talent_role,
            category: self.category.clone(),
            location: self.location.clone(),
            experience: self.experience.clone(),
            skills: self.skills.clone(),
            languages: self.languages.clone(),
            bio: self.bio.clone(),
            avatar: self.profile_picture.clone(),
            verified: self.is_verified,
            has_disability: self.has_disability,
            disability_type: self.disability_type.clone(),
            joined_date: self.created_at,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims entries, drops blanks and duplicates while keeping the first occurrence.
pub(crate) fn clean_list(values: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !cleaned.iter().any(|existing| existing == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

/// Minimal account description returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
}

/// Public projection of a talent, as listed by `/api/talents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TalentView {
    pub id: Uuid,
    pub name: String,
    pub role: Option<TalentRole>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub verified: bool,
    pub has_disability: bool,
    pub disability_type: Option<String>,
    pub joined_date: DateTime<Utc>,
}

/// Partial profile update accepted by `PUT /api/auth/profile`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(
        length(min = 1, max = 50, message = "Name must be 1 to 50 characters"),
        custom = "not_blank"
    )]
    pub name: Option<String>,
    #[validate(length(max = 20), custom = "phone_or_blank")]
    pub phone: Option<String>,
    #[serde(alias = "role", alias = "userRole")]
    pub talent_role: Option<TalentRole>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub experience: Option<String>,
    #[validate(length(max = 50))]
    pub skills: Option<Vec<String>>,
    #[validate(length(max = 20))]
    pub languages: Option<Vec<String>>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    pub has_disability: Option<bool>,
    #[validate(length(max = 100))]
    pub disability_type: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot be more than 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub company_name: Option<String>,
    #[serde(alias = "profile_picture")]
    #[validate(custom = "image_data_uri")]
    pub profile_picture: Option<String>,
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "Name cannot be blank"));
    }
    Ok(())
}

/// An empty phone clears the stored number.
fn phone_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || crate::auth::is_valid_phone(value) {
        Ok(())
    } else {
        Err(validation_error("phone", "Please enter a valid phone number"))
    }
}

/// Profile pictures are the data URIs produced by the upload endpoint.
pub(crate) fn image_data_uri(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    crate::upload::validate_data_uri(value)
        .map(|_| ())
        .map_err(|_| validation_error("data_uri", "Profile picture must be an uploaded image"))
}
