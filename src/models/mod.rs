/// Returned when a wire string does not name any variant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum using the
/// same spellings as its serde representation.
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::models::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err($crate::models::UnknownVariant {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod admin_action;
pub mod application;
pub mod notification;
pub mod pagination;
pub mod project;
pub mod user;

pub use admin_action::{AdminAction, TargetType};
pub use application::{
    Application, ApplicationInput, ApplicationQuery, ApplicationStats, ApplicationStatus,
    ApplicationStatusUpdate, PortfolioItem, PortfolioKind,
};
pub use notification::{
    ActionKind, Notification, NotificationAction, NotificationPriority, NotificationQuery,
    NotificationSender, NotificationType, ProjectRef,
};
pub use pagination::{Page, PageRequest, PaginationMeta};
pub use project::{
    ActivityError, Budget, Company, Project, ProjectActivity, ProjectInput, ProjectQuery,
    ProjectRole, ProjectRoleInput, ProjectStats, ProjectStatus, ProjectType, ProjectUpdate,
    Requirements, RoleBudget, Timeline,
};
pub use user::{AccountRole, ProfileUpdate, Purpose, TalentRole, TalentView, User, UserSummary};

