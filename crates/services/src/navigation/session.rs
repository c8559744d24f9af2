use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use learn_core::Clock;
use learn_core::model::{Lesson, Module, Question};
use learn_core::render::StyledText;
use storage::ContentStore;
use tokio::sync::watch;

use super::snapshot::{LessonState, NavigationSnapshot, TestState, TestSummary};
use crate::error::NavigationError;
use crate::styling::Styler;

//
// ─── CURSORS ───────────────────────────────────────────────────────────────────
//

// Index and cached entity always move together.
#[derive(Debug, Clone)]
struct LessonCursor {
    index: usize,
    lesson: Lesson,
}

#[derive(Debug, Clone)]
struct QuestionCursor {
    index: usize,
    question: Question,
    correct_answer_index: usize,
}

impl QuestionCursor {
    fn new(index: usize, question: Question) -> Self {
        let correct_answer_index = question.correct_index;
        Self {
            index,
            question,
            correct_answer_index,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Cursor over the modules of a `ContentStore`: lessons, tests and a score.
///
/// The selected module is cached when chosen; later appends to the store do
/// not refresh it. Index preconditions are checked and reported as
/// `NavigationError`, leaving the session untouched.
pub struct NavigationSession {
    store: ContentStore,
    styler: Styler,
    clock: Clock,
    module_index: Option<usize>,
    module: Option<Arc<Module>>,
    lesson: Option<LessonCursor>,
    question: Option<QuestionCursor>,
    styled_text: Option<StyledText>,
    test_score: u32,
    lesson_link_selected: Option<usize>,
    test_link_selected: Option<usize>,
    test_started_at: Option<DateTime<Utc>>,
    test_completed_at: Option<DateTime<Utc>>,
    updates: watch::Sender<NavigationSnapshot>,
}

impl NavigationSession {
    #[must_use]
    pub fn new(store: ContentStore, styler: Styler, clock: Clock) -> Self {
        let (updates, _) = watch::channel(NavigationSnapshot::default());
        Self {
            store,
            styler,
            clock,
            module_index: None,
            module: None,
            lesson: None,
            question: None,
            styled_text: None,
            test_score: 0,
            lesson_link_selected: None,
            test_link_selected: None,
            test_started_at: None,
            test_completed_at: None,
            updates,
        }
    }

    // ─── Module selection ──────────────────────────────────────────────────

    /// Select the module at `index` in the store.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::ModuleOutOfBounds` if the store does not hold
    /// that many modules yet.
    pub fn begin_module(&mut self, index: usize) -> Result<(), NavigationError> {
        let module = self.resolve_module(index)?;
        self.module_index = Some(index);
        self.module = Some(module);
        tracing::debug!(index, "module selected");
        self.publish();
        Ok(())
    }

    fn resolve_module(&self, index: usize) -> Result<Arc<Module>, NavigationError> {
        self.store
            .module(index)
            .ok_or_else(|| NavigationError::ModuleOutOfBounds {
                index,
                len: self.store.len(),
            })
    }

    fn selected_module(&self) -> Result<&Arc<Module>, NavigationError> {
        self.module.as_ref().ok_or(NavigationError::NoModule)
    }

    // ─── Lesson flow ───────────────────────────────────────────────────────

    /// Open lesson `index` of the selected module and restyle its text.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoModule` without a selected module, or
    /// `NavigationError::LessonOutOfBounds` if the module has no such lesson.
    pub fn begin_lesson(&mut self, index: usize) -> Result<(), NavigationError> {
        let module = self.selected_module()?;
        let lesson = module
            .lessons()
            .get(index)
            .cloned()
            .ok_or(NavigationError::LessonOutOfBounds {
                index,
                len: module.lesson_count(),
            })?;

        self.styled_text = Some(self.styler.style(&lesson.explanation));
        self.lesson = Some(LessonCursor { index, lesson });
        tracing::debug!(index, "lesson opened");
        self.publish();
        Ok(())
    }

    /// Whether the selected module has a lesson after the current one.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveLesson` when no lesson is open.
    pub fn has_next_lesson(&self) -> Result<bool, NavigationError> {
        let cursor = self
            .lesson
            .as_ref()
            .ok_or(NavigationError::NoActiveLesson)?;
        let module = self.selected_module()?;
        Ok(cursor.index + 1 < module.lesson_count())
    }

    /// Advance to the next lesson, or close the lesson flow after the last one.
    ///
    /// Closing clears the lesson cursor and the lesson link selection; the
    /// styled text of the last lesson is left in place.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveLesson` when no lesson is open.
    pub fn next_lesson(&mut self) -> Result<(), NavigationError> {
        if self.has_next_lesson()? {
            let next = self.lesson.as_ref().map_or(0, |cursor| cursor.index + 1);
            return self.begin_lesson(next);
        }

        self.lesson = None;
        self.lesson_link_selected = None;
        tracing::debug!("lesson flow finished");
        self.publish();
        Ok(())
    }

    // ─── Test flow ─────────────────────────────────────────────────────────

    /// Select module `module_index` and open its first test question.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::ModuleOutOfBounds` for an unknown module, or
    /// `NavigationError::EmptyTest` if the module has no questions.
    pub fn begin_test(&mut self, module_index: usize) -> Result<(), NavigationError> {
        let module = self.resolve_module(module_index)?;
        let question = module
            .questions()
            .first()
            .cloned()
            .ok_or(NavigationError::EmptyTest)?;

        self.module_index = Some(module_index);
        self.module = Some(module);
        self.styled_text = Some(self.styler.style(&question.content));
        self.question = Some(QuestionCursor::new(0, question));
        self.test_started_at = Some(self.clock.now());
        self.test_completed_at = None;
        tracing::debug!(module_index, "test started");
        self.publish();
        Ok(())
    }

    /// Whether the selected module has a question after the current one.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveQuestion` when no question is open.
    pub fn has_next_question(&self) -> Result<bool, NavigationError> {
        let cursor = self
            .question
            .as_ref()
            .ok_or(NavigationError::NoActiveQuestion)?;
        let module = self.selected_module()?;
        Ok(cursor.index + 1 < module.question_count())
    }

    /// Advance to the next question, or finish the test after the last one.
    ///
    /// Finishing clears the question cursor, the correct answer and the
    /// styled text. The score is kept.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveQuestion` when no question is open.
    pub fn next_question(&mut self) -> Result<(), NavigationError> {
        if self.has_next_question()? {
            let next = self.question.as_ref().map_or(0, |cursor| cursor.index + 1);
            let question = self
                .selected_module()?
                .questions()
                .get(next)
                .cloned()
                .ok_or(NavigationError::NoActiveQuestion)?;

            self.styled_text = Some(self.styler.style(&question.content));
            self.question = Some(QuestionCursor::new(next, question));
            tracing::debug!(index = next, "question opened");
            self.publish();
            return Ok(());
        }

        self.question = None;
        self.styled_text = None;
        self.test_completed_at = Some(self.clock.now());
        tracing::debug!(score = self.test_score, "test finished");
        self.publish();
        Ok(())
    }

    /// Score `selected` against the open question.
    ///
    /// Adds one point and returns true iff it matches the correct answer.
    /// Without an open question nothing is scored.
    pub fn score_question(&mut self, selected: usize) -> bool {
        let correct = self
            .question
            .as_ref()
            .is_some_and(|cursor| cursor.question.is_correct(selected));
        if correct {
            self.test_score += 1;
            self.publish();
        }
        correct
    }

    // ─── Link selection ────────────────────────────────────────────────────

    pub fn select_lesson_link(&mut self, module_index: Option<usize>) {
        self.lesson_link_selected = module_index;
        self.publish();
    }

    pub fn select_test_link(&mut self, module_index: Option<usize>) {
        self.test_link_selected = module_index;
        self.publish();
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    #[must_use]
    pub fn current_module_index(&self) -> Option<usize> {
        self.module_index
    }

    #[must_use]
    pub fn current_module(&self) -> Option<&Module> {
        self.module.as_deref()
    }

    #[must_use]
    pub fn current_lesson_index(&self) -> Option<usize> {
        self.lesson.as_ref().map(|cursor| cursor.index)
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.lesson.as_ref().map(|cursor| &cursor.lesson)
    }

    #[must_use]
    pub fn current_question_index(&self) -> Option<usize> {
        self.question.as_ref().map(|cursor| cursor.index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.question.as_ref().map(|cursor| &cursor.question)
    }

    #[must_use]
    pub fn correct_answer_index(&self) -> Option<usize> {
        self.question
            .as_ref()
            .map(|cursor| cursor.correct_answer_index)
    }

    #[must_use]
    pub fn current_styled_text(&self) -> Option<&StyledText> {
        self.styled_text.as_ref()
    }

    #[must_use]
    pub fn test_score(&self) -> u32 {
        self.test_score
    }

    #[must_use]
    pub fn lesson_link_selected(&self) -> Option<usize> {
        self.lesson_link_selected
    }

    #[must_use]
    pub fn test_link_selected(&self) -> Option<usize> {
        self.test_link_selected
    }

    /// Score against the selected module's question count.
    #[must_use]
    pub fn test_summary(&self) -> Option<TestSummary> {
        let module = self.module.as_ref()?;
        Some(TestSummary {
            score: self.test_score,
            total: module.question_count(),
            started_at: self.test_started_at,
            completed_at: self.test_completed_at,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> NavigationSnapshot {
        let lesson = match &self.lesson {
            Some(cursor) => LessonState::InLesson {
                index: cursor.index,
            },
            None => LessonState::NoLesson,
        };
        let test = match (&self.question, self.module_index) {
            (Some(cursor), Some(module_index)) => TestState::InTest {
                module_index,
                question_index: cursor.index,
            },
            _ => TestState::NoTest,
        };

        NavigationSnapshot {
            module_index: self.module_index,
            lesson,
            test,
            test_score: self.test_score,
            has_styled_text: self.styled_text.is_some(),
            lesson_link_selected: self.lesson_link_selected,
            test_link_selected: self.test_link_selected,
        }
    }

    /// Subscribe to a fresh snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavigationSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

impl fmt::Debug for NavigationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationSession")
            .field("module_index", &self.module_index)
            .field("lesson_index", &self.current_lesson_index())
            .field("question_index", &self.current_question_index())
            .field("test_score", &self.test_score)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{LessonId, ModuleId, QuestionId};
    use learn_core::time::{fixed_clock, fixed_now};

    fn lesson(id: u64) -> Lesson {
        Lesson::new(LessonId::new(id), format!("L{id}"), format!("<p>Lesson {id}</p>"))
    }

    fn question(id: u64, correct: usize) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("<p>Question {id}</p>"),
            vec!["a".into(), "b".into(), "c".into()],
            correct,
        )
    }

    fn store_with(modules: Vec<Module>) -> ContentStore {
        let store = ContentStore::new();
        store.append(modules);
        store
    }

    fn two_by_two() -> Module {
        Module::new(
            ModuleId::new(1),
            "Ownership",
            vec![lesson(0), lesson(1)],
            vec![question(0, 1), question(1, 0)],
        )
    }

    fn session(store: ContentStore) -> NavigationSession {
        NavigationSession::new(store, Styler::default(), fixed_clock())
    }

    #[test]
    fn lesson_walkthrough_ends_with_cleared_cursor() {
        let mut nav = session(store_with(vec![two_by_two()]));
        nav.begin_module(0).unwrap();
        nav.select_lesson_link(Some(0));

        nav.begin_lesson(0).unwrap();
        assert_eq!(nav.current_lesson().map(|l| l.id), Some(LessonId::new(0)));
        assert_eq!(nav.has_next_lesson(), Ok(true));

        nav.next_lesson().unwrap();
        assert_eq!(nav.current_lesson().map(|l| l.id), Some(LessonId::new(1)));
        assert_eq!(nav.current_lesson_index(), Some(1));
        assert_eq!(nav.has_next_lesson(), Ok(false));

        nav.next_lesson().unwrap();
        assert!(nav.current_lesson().is_none());
        assert!(nav.current_lesson_index().is_none());
        assert!(nav.lesson_link_selected().is_none());
        assert!(nav.current_styled_text().is_some());
        assert_eq!(nav.snapshot().lesson, LessonState::NoLesson);
    }

    #[test]
    fn begin_lesson_is_idempotent() {
        let mut nav = session(store_with(vec![two_by_two()]));
        nav.begin_module(0).unwrap();

        nav.begin_lesson(1).unwrap();
        let first = (nav.current_lesson().cloned(), nav.current_styled_text().cloned());
        nav.begin_lesson(1).unwrap();
        let second = (nav.current_lesson().cloned(), nav.current_styled_text().cloned());
        assert_eq!(first, second);
        assert!(first.1.is_some_and(|text| text.plain() == "Lesson 1"));
    }

    #[test]
    fn test_walkthrough_scores_only_correct_answers() {
        let mut nav = session(store_with(vec![two_by_two()]));

        nav.begin_test(0).unwrap();
        assert_eq!(nav.current_question().map(|q| q.id), Some(QuestionId::new(0)));
        assert_eq!(nav.correct_answer_index(), Some(1));
        assert_eq!(nav.has_next_question(), Ok(true));
        assert!(nav.score_question(1));
        assert_eq!(nav.test_score(), 1);

        nav.next_question().unwrap();
        assert_eq!(nav.current_question().map(|q| q.id), Some(QuestionId::new(1)));
        assert_eq!(nav.correct_answer_index(), Some(0));
        assert_eq!(nav.has_next_question(), Ok(false));
        assert!(!nav.score_question(1));
        assert_eq!(nav.test_score(), 1);

        nav.next_question().unwrap();
        assert!(nav.current_question().is_none());
        assert!(nav.current_question_index().is_none());
        assert!(nav.correct_answer_index().is_none());
        assert!(nav.current_styled_text().is_none());
        assert_eq!(nav.snapshot().test, TestState::NoTest);

        let summary = nav.test_summary().unwrap();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.started_at, Some(fixed_now()));
        assert!(summary.is_complete());
    }

    #[test]
    fn scoring_without_question_is_a_no_op() {
        let mut nav = session(store_with(vec![two_by_two()]));
        assert!(!nav.score_question(0));
        assert_eq!(nav.test_score(), 0);
    }

    #[test]
    fn score_is_kept_across_tests() {
        let mut nav = session(store_with(vec![two_by_two()]));
        nav.begin_test(0).unwrap();
        nav.score_question(1);
        nav.begin_test(0).unwrap();
        nav.score_question(1);
        assert_eq!(nav.test_score(), 2);
    }

    #[test]
    fn out_of_bounds_module_is_rejected() {
        let mut nav = session(store_with(vec![two_by_two()]));
        assert_eq!(
            nav.begin_module(3),
            Err(NavigationError::ModuleOutOfBounds { index: 3, len: 1 })
        );
        assert!(nav.current_module().is_none());
        assert_eq!(nav.begin_test(3), Err(NavigationError::ModuleOutOfBounds { index: 3, len: 1 }));
    }

    #[test]
    fn lesson_requires_module_and_valid_index() {
        let mut nav = session(store_with(vec![two_by_two()]));
        assert_eq!(nav.begin_lesson(0), Err(NavigationError::NoModule));

        nav.begin_module(0).unwrap();
        nav.begin_lesson(0).unwrap();
        assert_eq!(
            nav.begin_lesson(5),
            Err(NavigationError::LessonOutOfBounds { index: 5, len: 2 })
        );
        assert_eq!(nav.current_lesson_index(), Some(0));
    }

    #[test]
    fn cursor_queries_require_active_cursor() {
        let mut nav = session(store_with(vec![two_by_two()]));
        assert_eq!(nav.has_next_lesson(), Err(NavigationError::NoActiveLesson));
        assert_eq!(nav.next_lesson(), Err(NavigationError::NoActiveLesson));
        assert_eq!(nav.has_next_question(), Err(NavigationError::NoActiveQuestion));
        assert_eq!(nav.next_question(), Err(NavigationError::NoActiveQuestion));
    }

    #[test]
    fn empty_test_leaves_previous_selection() {
        let empty = Module::new(ModuleId::new(2), "Empty", vec![lesson(0)], Vec::new());
        let mut nav = session(store_with(vec![two_by_two(), empty]));
        nav.begin_module(0).unwrap();

        assert_eq!(nav.begin_test(1), Err(NavigationError::EmptyTest));
        assert_eq!(nav.current_module_index(), Some(0));
        assert_eq!(nav.current_module().map(|m| m.id), Some(ModuleId::new(1)));
    }

    #[test]
    fn cached_module_is_not_refreshed_by_later_appends() {
        let store = store_with(vec![two_by_two()]);
        let mut nav = session(store.clone());
        nav.begin_module(0).unwrap();

        store.append(vec![Module::new(ModuleId::new(7), "Late", Vec::new(), Vec::new())]);
        assert_eq!(nav.current_module().map(|m| m.id), Some(ModuleId::new(1)));
        nav.begin_module(1).unwrap();
        assert_eq!(nav.current_module().map(|m| m.id), Some(ModuleId::new(7)));
    }

    #[test]
    fn subscribers_see_every_change() {
        let mut nav = session(store_with(vec![two_by_two()]));
        let mut rx = nav.subscribe();

        nav.begin_test(0).unwrap();
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(
            snapshot.test,
            TestState::InTest {
                module_index: 0,
                question_index: 0
            }
        );
        assert!(snapshot.has_styled_text);

        nav.score_question(1);
        assert_eq!(rx.borrow_and_update().test_score, 1);

        nav.score_question(0);
        assert!(!rx.has_changed().unwrap());
    }
}
