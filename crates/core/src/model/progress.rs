use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::model::ids::{CourseId, LessonId};

/// Per-user completion state: course id mapped to the set of completed
/// lesson ids, plus the time of the last mutation.
///
/// The record does not check stored lesson ids against any catalog; callers
/// that report totals intersect with the actual lesson list themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    courses: BTreeMap<CourseId, BTreeSet<LessonId>>,
    last_updated: DateTime<Utc>,
}

impl ProgressRecord {
    /// An empty record, created the first time a user's progress is touched.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            courses: BTreeMap::new(),
            last_updated: now,
        }
    }

    /// Rehydrates a record from persisted storage.
    #[must_use]
    pub fn from_persisted(
        courses: BTreeMap<CourseId, BTreeSet<LessonId>>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            courses,
            last_updated,
        }
    }

    // Accessors
    #[must_use]
    pub fn courses(&self) -> &BTreeMap<CourseId, BTreeSet<LessonId>> {
        &self.courses
    }

    #[must_use]
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Completed lessons stored for a course, if the course was ever touched.
    #[must_use]
    pub fn completed_lessons(&self, course: CourseId) -> Option<&BTreeSet<LessonId>> {
        self.courses.get(&course)
    }

    #[must_use]
    pub fn is_completed(&self, course: CourseId, lesson: LessonId) -> bool {
        self.courses
            .get(&course)
            .is_some_and(|set| set.contains(&lesson))
    }

    /// Toggles a lesson's membership in the course's completed set.
    ///
    /// Returns `true` when the lesson is completed after the call.
    pub fn toggle_lesson(&mut self, course: CourseId, lesson: LessonId) -> bool {
        let set = self.courses.entry(course).or_default();
        if set.remove(&lesson) {
            false
        } else {
            set.insert(lesson);
            true
        }
    }

    /// Replaces the course's completed set with exactly the given lessons.
    pub fn set_course_lessons(
        &mut self,
        course: CourseId,
        lessons: impl IntoIterator<Item = LessonId>,
    ) {
        self.courses.insert(course, lessons.into_iter().collect());
    }

    /// Stamps the last-updated time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn course() -> CourseId {
        CourseId::new(1)
    }

    #[test]
    fn new_record_is_empty() {
        let record = ProgressRecord::new(fixed_now());
        assert!(record.courses().is_empty());
        assert_eq!(record.last_updated(), fixed_now());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut record = ProgressRecord::new(fixed_now());
        assert!(record.toggle_lesson(course(), LessonId::new(2)));
        assert!(record.is_completed(course(), LessonId::new(2)));

        assert!(!record.toggle_lesson(course(), LessonId::new(2)));
        assert!(!record.is_completed(course(), LessonId::new(2)));
    }

    #[test]
    fn toggle_twice_restores_original_membership() {
        let mut record = ProgressRecord::new(fixed_now());
        record.toggle_lesson(course(), LessonId::new(1));
        let before = record.completed_lessons(course()).cloned();

        record.toggle_lesson(course(), LessonId::new(3));
        record.toggle_lesson(course(), LessonId::new(3));

        assert_eq!(record.completed_lessons(course()).cloned(), before);
    }

    #[test]
    fn set_course_lessons_overwrites_unconditionally() {
        let mut record = ProgressRecord::new(fixed_now());
        record.toggle_lesson(course(), LessonId::new(9));

        let all = [LessonId::new(1), LessonId::new(2), LessonId::new(3)];
        record.set_course_lessons(course(), all);
        record.set_course_lessons(course(), all);

        let stored = record.completed_lessons(course()).unwrap();
        assert_eq!(stored.len(), 3);
        assert!(!stored.contains(&LessonId::new(9)));
    }

    #[test]
    fn touch_updates_timestamp() {
        let mut record = ProgressRecord::new(fixed_now());
        let later = fixed_now() + Duration::minutes(5);
        record.touch(later);
        assert_eq!(record.last_updated(), later);
    }
}
