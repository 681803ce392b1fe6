mod course;
mod ids;
mod progress;
mod session;
mod user;

pub use course::{Course, CourseLevel, Lesson};
pub use ids::{CourseId, LessonId, ParseIdError, UserId};
pub use progress::ProgressRecord;
pub use session::Session;
pub use user::{MIN_PASSWORD_LEN, User, UserProfile, ValidationError};
