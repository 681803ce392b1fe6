use std::collections::BTreeSet;
use std::sync::Arc;

use learnhub_core::Catalog;
use learnhub_core::model::{CourseId, LessonId, ProgressRecord};
use storage::repository::{ProgressRepository, SessionRepository};

use crate::Clock;
use crate::error::ProgressError;

/// Completion report for one course, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
    pub completed_lessons: BTreeSet<LessonId>,
}

impl CourseProgress {
    fn empty() -> Self {
        Self {
            completed: 0,
            total: 0,
            percentage: 0,
            completed_lessons: BTreeSet::new(),
        }
    }
}

/// Catalog-wide counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

/// Tracks which lessons the current user has completed, per course.
///
/// Every operation resolves the active session first; with nobody logged in,
/// reads report empty state and writes are no-ops.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    sessions: Arc<dyn SessionRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        sessions: Arc<dyn SessionRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            sessions,
            progress,
        }
    }

    /// The current user's progress record, initialized (and persisted) on
    /// first touch. Returns `Ok(None)` only when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persistence fails.
    pub fn get_progress(&self) -> Result<Option<ProgressRecord>, ProgressError> {
        let Some(session) = self.sessions.current()? else {
            return Ok(None);
        };

        if let Some(record) = self.progress.get(session.user_id())? {
            return Ok(Some(record));
        }

        let record = ProgressRecord::new(self.clock.now());
        self.progress.put(session.user_id(), &record)?;
        Ok(Some(record))
    }

    /// Overwrites the current user's record, stamping a fresh last-updated
    /// time. No-op when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persistence fails.
    pub fn save_progress(&self, mut record: ProgressRecord) -> Result<(), ProgressError> {
        let Some(session) = self.sessions.current()? else {
            return Ok(());
        };

        record.touch(self.clock.now());
        self.progress.put(session.user_id(), &record)?;
        Ok(())
    }

    /// Completion report for one course.
    ///
    /// Unknown courses report zero everywhere. Stored completed-lesson ids
    /// are intersected with the course's actual lessons, so a stale record
    /// can never report more completions than the course has lessons.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persistence fails.
    pub fn course_progress(&self, course_id: CourseId) -> Result<CourseProgress, ProgressError> {
        let Some(course) = self.catalog.course(course_id) else {
            return Ok(CourseProgress::empty());
        };
        let lesson_ids: BTreeSet<LessonId> = course.lesson_ids().collect();

        let completed_lessons: BTreeSet<LessonId> = match self.get_progress()? {
            Some(record) => record
                .completed_lessons(course_id)
                .map(|stored| stored.intersection(&lesson_ids).copied().collect())
                .unwrap_or_default(),
            None => BTreeSet::new(),
        };

        let total = lesson_ids.len();
        let completed = completed_lessons.len();
        Ok(CourseProgress {
            completed,
            total,
            percentage: percentage(completed, total),
            completed_lessons,
        })
    }

    /// Toggles one lesson's completed state for the current user as a single
    /// read-modify-write. No-op when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persistence fails.
    pub fn toggle_lesson(
        &self,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<(), ProgressError> {
        let Some(mut record) = self.get_progress()? else {
            return Ok(());
        };

        record.toggle_lesson(course_id, lesson_id);
        self.save_progress(record)
    }

    /// Marks every lesson of the course completed, unconditionally.
    /// Idempotent; no-op for unknown courses or when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persistence fails.
    pub fn mark_course_complete(&self, course_id: CourseId) -> Result<(), ProgressError> {
        let Some(course) = self.catalog.course(course_id) else {
            return Ok(());
        };
        let Some(mut record) = self.get_progress()? else {
            return Ok(());
        };

        record.set_course_lessons(course_id, course.lesson_ids());
        self.save_progress(record)
    }

    /// Dashboard counts: a course is completed at 100 percent, in progress
    /// anywhere above zero.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if persistence fails.
    pub fn stats(&self) -> Result<CourseStats, ProgressError> {
        let mut completed = 0;
        let mut in_progress = 0;
        for course in self.catalog.courses() {
            let report = self.course_progress(course.id())?;
            if report.percentage == 100 {
                completed += 1;
            } else if report.percentage > 0 {
                in_progress += 1;
            }
        }

        Ok(CourseStats {
            total: self.catalog.courses().len(),
            completed,
            in_progress,
        })
    }
}

fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = completed as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    use learnhub_core::time::fixed_now;
    use storage::repository::Storage;

    use crate::account_service::AccountService;

    fn setup() -> (AccountService, ProgressService, Storage) {
        let storage = Storage::in_memory();
        let clock = Clock::fixed(fixed_now());
        let accounts = AccountService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        );
        let progress = ProgressService::new(
            clock,
            Arc::new(Catalog::seeded()),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        );
        (accounts, progress, storage)
    }

    fn logged_in() -> (AccountService, ProgressService) {
        let (accounts, progress, _) = setup();
        accounts
            .register("Ada", "ada@example.com", "secret1")
            .unwrap();
        accounts.login("ada@example.com", "secret1").unwrap();
        (accounts, progress)
    }

    #[test]
    fn get_progress_without_session_is_none() {
        let (_, progress, _) = setup();
        assert!(progress.get_progress().unwrap().is_none());
    }

    #[test]
    fn get_progress_lazily_initializes_for_the_session_user() {
        let (_, progress) = logged_in();
        let record = progress.get_progress().unwrap().unwrap();
        assert!(record.courses().is_empty());
    }

    #[test]
    fn toggle_without_session_is_a_no_op() {
        let (_, progress, storage) = setup();
        progress
            .toggle_lesson(CourseId::new(1), LessonId::new(1))
            .unwrap();
        assert!(storage.sessions.current().unwrap().is_none());
    }

    #[test]
    fn toggle_marks_and_unmarks_a_lesson() {
        let (_, progress) = logged_in();
        let course = CourseId::new(1);
        let lesson = LessonId::new(2);

        progress.toggle_lesson(course, lesson).unwrap();
        let report = progress.course_progress(course).unwrap();
        assert_eq!(report.completed, 1);
        assert!(report.completed_lessons.contains(&lesson));

        progress.toggle_lesson(course, lesson).unwrap();
        let report = progress.course_progress(course).unwrap();
        assert_eq!(report.completed, 0);
        assert!(report.completed_lessons.is_empty());
    }

    #[test]
    fn course_progress_for_unknown_course_is_all_zeros() {
        let (_, progress) = logged_in();
        let report = progress.course_progress(CourseId::new(99)).unwrap();
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 0);
        assert_eq!(report.percentage, 0);
        assert!(report.completed_lessons.is_empty());
    }

    #[test]
    fn one_of_three_lessons_rounds_to_33() {
        use learnhub_core::model::{Course, CourseLevel, Lesson};

        let storage = Storage::in_memory();
        let clock = Clock::fixed(fixed_now());
        let accounts = AccountService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        );
        accounts
            .register("Ada", "ada@example.com", "secret1")
            .unwrap();
        accounts.login("ada@example.com", "secret1").unwrap();

        // A three-lesson course pins the rounding rule.
        let three = Catalog::new(vec![Course::new(
            CourseId::new(10),
            "Three Lessons",
            "",
            "#",
            "1 week",
            CourseLevel::Beginner,
            vec![
                Lesson::new(LessonId::new(1), "a", "5 min", ""),
                Lesson::new(LessonId::new(2), "b", "5 min", ""),
                Lesson::new(LessonId::new(3), "c", "5 min", ""),
            ],
        )]);
        let progress = ProgressService::new(
            clock,
            Arc::new(three),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        );

        progress
            .toggle_lesson(CourseId::new(10), LessonId::new(1))
            .unwrap();
        let report = progress.course_progress(CourseId::new(10)).unwrap();
        assert_eq!(report.percentage, 33);
    }

    #[test]
    fn percentage_bounds_and_completion() {
        let (_, progress) = logged_in();
        let course = CourseId::new(1);

        progress.mark_course_complete(course).unwrap();
        let report = progress.course_progress(course).unwrap();
        assert_eq!(report.completed, report.total);
        assert_eq!(report.percentage, 100);

        for other in Catalog::seeded().courses() {
            let report = progress.course_progress(other.id()).unwrap();
            assert!(report.percentage <= 100);
        }
    }

    #[test]
    fn mark_course_complete_is_idempotent_and_toggle_still_works() {
        let (_, progress) = logged_in();
        let course = CourseId::new(2);

        progress.mark_course_complete(course).unwrap();
        let first = progress.course_progress(course).unwrap();
        progress.mark_course_complete(course).unwrap();
        let second = progress.course_progress(course).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.percentage, 100);

        progress
            .toggle_lesson(course, LessonId::new(1))
            .unwrap();
        let report = progress.course_progress(course).unwrap();
        assert_eq!(report.completed, report.total - 1);
        assert!(report.percentage < 100);
    }

    #[test]
    fn mark_course_complete_for_unknown_course_is_a_no_op() {
        let (_, progress) = logged_in();
        progress.mark_course_complete(CourseId::new(99)).unwrap();
        let record = progress.get_progress().unwrap().unwrap();
        assert!(record.courses().is_empty());
    }

    #[test]
    fn stale_lesson_ids_never_inflate_the_report() {
        let (_, progress) = logged_in();
        let course = CourseId::new(1);

        let mut record = progress.get_progress().unwrap().unwrap();
        record.set_course_lessons(
            course,
            [
                LessonId::new(1),
                LessonId::new(2),
                // Ids beyond the course's real lessons, as a corrupted or
                // stale store could contain.
                LessonId::new(98),
                LessonId::new(99),
            ],
        );
        progress.save_progress(record).unwrap();

        let report = progress.course_progress(course).unwrap();
        assert_eq!(report.completed, 2);
        assert_eq!(report.total, 5);
        assert_eq!(report.percentage, 40);
        assert!(!report.completed_lessons.contains(&LessonId::new(99)));
    }

    #[test]
    fn save_progress_stamps_last_updated() {
        let (accounts, progress, storage) = setup();
        accounts
            .register("Ada", "ada@example.com", "secret1")
            .unwrap();
        accounts.login("ada@example.com", "secret1").unwrap();
        let record = progress.get_progress().unwrap().unwrap();

        let mut later_clock = Clock::fixed(fixed_now());
        later_clock.advance(chrono::Duration::minutes(10));
        let later_progress = ProgressService::new(
            later_clock,
            Arc::new(Catalog::seeded()),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        );
        later_progress.save_progress(record).unwrap();

        let saved = later_progress.get_progress().unwrap().unwrap();
        assert_eq!(saved.last_updated(), later_clock.now());
    }

    #[test]
    fn stats_counts_completed_and_in_progress_courses() {
        let (_, progress) = logged_in();

        let initial = progress.stats().unwrap();
        assert_eq!(initial.total, 4);
        assert_eq!(initial.completed, 0);
        assert_eq!(initial.in_progress, 0);

        progress.mark_course_complete(CourseId::new(1)).unwrap();
        progress
            .toggle_lesson(CourseId::new(2), LessonId::new(1))
            .unwrap();

        let stats = progress.stats().unwrap();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
    }
}
