use std::fmt;

use crate::model::ids::{CourseId, LessonId};

/// Difficulty label attached to a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        };
        write!(f, "{label}")
    }
}

/// A single lesson inside a course.
///
/// Lessons are static catalog data; the id is unique within its course only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    duration: String,
    content: String,
}

impl Lesson {
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        duration: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            duration: duration.into(),
            content: content.into(),
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Human-readable duration label, e.g. "45 min".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A course with its ordered lesson sequence.
///
/// Courses are immutable once built; every caller shares the same data
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    icon: String,
    duration: String,
    level: CourseLevel,
    lessons: Vec<Lesson>,
}

impl Course {
    #[must_use]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        duration: impl Into<String>,
        level: CourseLevel,
        lessons: Vec<Lesson>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            duration: duration.into(),
            level,
            lessons,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Human-readable duration label, e.g. "8 weeks".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn level(&self) -> CourseLevel {
        self.level
    }

    /// Lessons in catalog order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    /// Ids of every lesson in the course, in order.
    pub fn lesson_ids(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.lessons.iter().map(Lesson::id)
    }
}
