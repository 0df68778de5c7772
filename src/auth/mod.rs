pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::user::{image_data_uri, not_blank};
use crate::models::{Purpose, TalentRole, User, UserSummary};

// Re-export necessary items
pub use extractors::{AdminSession, Session, SessionState};
pub use middleware::SessionMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, IssuedToken, TokenKeys};

lazy_static! {
    // Digits with optional leading +, spaces, dashes and parentheses.
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap();
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide a password"))]
    pub password: String,
}

/// Represents the payload for a new account registration.
///
/// Talent registrations must describe the talent (`talentRole`, `category`,
/// `experience`, `location`); professional registrations must name a company.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 50, message = "Name cannot be more than 50 characters"),
        custom = "not_blank"
    )]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub purpose: Purpose,
    #[validate(regex(path = "PHONE_REGEX", message = "Please enter a valid phone number"))]
    pub phone: Option<String>,
    #[serde(alias = "role", alias = "userRole")]
    pub talent_role: Option<TalentRole>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub experience: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub skills: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub languages: Vec<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[serde(default)]
    pub has_disability: bool,
    #[validate(length(max = 100))]
    pub disability_type: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot be more than 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub company_name: Option<String>,
    /// Data URI returned by the profile image upload.
    #[serde(alias = "profile_picture")]
    #[validate(custom = "image_data_uri")]
    pub profile_picture: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

impl RegisterRequest {
    /// Purpose-dependent required fields, reported like any other validation failure.
    pub fn check_purpose_fields(&self) -> Result<(), AppError> {
        match self.purpose {
            Purpose::Talent => {
                if self.talent_role.is_none() {
                    return Err(AppError::invalid_field("talentRole", "Talent role is required"));
                }
                for (field, value) in [
                    ("category", &self.category),
                    ("experience", &self.experience),
                    ("location", &self.location),
                ] {
                    if !present(value) {
                        return Err(AppError::invalid_field(field, &format!("{} is required", field)));
                    }
                }
            }
            Purpose::Professional => {
                if !present(&self.company_name) {
                    return Err(AppError::invalid_field(
                        "companyName",
                        "Company name is required",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Builds the account record; purpose-specific fields of the other purpose are dropped.
    pub fn into_user(self, password_hash: String) -> User {
        let mut user = User::new(
            &self.name,
            &self.email,
            password_hash,
            self.purpose.default_role(),
            self.purpose,
        );
        user.apply(crate::models::ProfileUpdate {
            phone: self.phone,
            bio: self.bio,
            profile_picture: self.profile_picture,
            ..Default::default()
        });
        match self.purpose {
            Purpose::Talent => user.apply(crate::models::ProfileUpdate {
                talent_role: self.talent_role,
                category: self.category,
                experience: self.experience,
                skills: Some(self.skills),
                languages: Some(self.languages),
                location: self.location,
                has_disability: Some(self.has_disability),
                disability_type: self.disability_type,
                ..Default::default()
            }),
            Purpose::Professional => user.apply(crate::models::ProfileUpdate {
                company_name: self.company_name,
                ..Default::default()
            }),
        }
        user.updated_at = user.created_at;
        user
    }
}

/// Response returned by every endpoint that hands out a token.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    /// The JWT for session authentication.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl AuthResponse {
    pub fn new(issued: IssuedToken, user: &User) -> Self {
        Self {
            success: true,
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.summary(),
        }
    }
}
