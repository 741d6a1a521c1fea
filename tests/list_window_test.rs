mod common;

use audition_admin::models::Question;
use audition_admin::views::{ListIntent, QuestionListWindow, Window};
use common::{question, questions};
use std::time::Duration;

fn window_with(questions: Vec<Question>) -> QuestionListWindow {
    let mut window = QuestionListWindow::new(20, Duration::from_secs(3));
    window.show_loading_state();
    window.populate_list(questions);
    window
}

fn visible_ids(window: &QuestionListWindow) -> Vec<i64> {
    window.visible_rows().iter().map(|q| q.id).collect()
}

#[test]
fn pages_hold_twenty_rows() {
    let mut window = window_with(questions(45));

    assert!(window.form_enabled());
    assert_eq!(window.total_pages(), 3);
    assert_eq!(visible_ids(&window), (1..=20).collect::<Vec<_>>());
    assert!(!window.has_prev_page());
    assert!(window.has_next_page());

    window.next_page();
    window.next_page();
    assert_eq!(window.current_page(), 3);
    assert_eq!(visible_ids(&window), (41..=45).collect::<Vec<_>>());
    assert!(!window.has_next_page());

    window.next_page();
    assert_eq!(window.current_page(), 3);
}

#[test]
fn empty_list_has_one_page() {
    let window = window_with(Vec::new());

    assert_eq!(window.total_pages(), 1);
    assert!(window.visible_rows().is_empty());
    assert!(!window.has_prev_page());
    assert!(!window.has_next_page());
}

#[test]
fn filter_resets_to_first_page() {
    let mut window = window_with(questions(45));
    window.next_page();

    window.set_filter("4");

    assert_eq!(window.current_page(), 1);
    // 4, 14, 24, 34, 40..=45
    assert_eq!(window.filtered_questions().len(), 10);
}

#[test]
fn filter_matches_source_id_and_audited_flag() {
    let mut data = questions(3);
    data[0].source = "Cambridge Mock Exam".to_string();
    data[1].is_audited = true;
    let mut window = window_with(data);

    window.set_filter("CAMBRIDGE");
    assert_eq!(visible_ids(&window), vec![1]);

    window.set_filter("yes");
    assert_eq!(visible_ids(&window), vec![2]);

    window.set_filter("no");
    assert_eq!(visible_ids(&window), vec![1, 3]);

    window.set_filter("3");
    assert_eq!(visible_ids(&window), vec![3]);

    window.set_filter("");
    assert_eq!(visible_ids(&window), vec![1, 2, 3]);
}

#[test]
fn filtering_is_idempotent_and_independent_of_page() {
    let mut paged = window_with(questions(60));
    paged.next_page();
    paged.next_page();
    paged.set_filter("1");
    let from_later_page = visible_ids(&paged);

    let mut fresh = window_with(questions(60));
    fresh.set_filter("1");
    fresh.set_filter("1");

    assert_eq!(from_later_page, visible_ids(&fresh));
    assert_eq!(paged.total_pages(), fresh.total_pages());
}

#[test]
fn repopulating_clamps_current_page() {
    let mut window = window_with(questions(45));
    window.next_page();
    window.next_page();

    window.populate_list(questions(5));

    assert_eq!(window.current_page(), 1);
    assert_eq!(visible_ids(&window), vec![1, 2, 3, 4, 5]);
}

#[test]
fn typing_edits_filter() {
    let mut window = window_with(questions(12));

    window.push_filter_char('1');
    window.push_filter_char('2');
    assert_eq!(window.filter(), "12");
    assert_eq!(visible_ids(&window), vec![12]);

    window.pop_filter_char();
    assert_eq!(window.filter(), "1");
    assert_eq!(visible_ids(&window), vec![1, 10, 11, 12]);
}

#[test]
fn opening_row_emits_edit_for_first_sub_question() {
    let mut window = window_with(questions(3));
    window.select_next();

    window.open_selected();

    assert_eq!(
        window.take_intents(),
        vec![ListIntent::EditSubQuestion {
            question_id: 2,
            sub_question_index: 0
        }]
    );
}

#[test]
fn question_without_sub_questions_is_not_opened() {
    let mut window = window_with(vec![question(1, 0)]);

    window.open_selected();

    assert!(window.take_intents().is_empty());
}

#[test]
fn selection_stays_within_page() {
    let mut window = window_with(questions(3));

    window.select_prev();
    assert_eq!(window.selected_row(), 0);
    for _ in 0..10 {
        window.select_next();
    }
    assert_eq!(window.selected_row(), 2);
    assert_eq!(window.selected_question().unwrap().id, 3);
}

#[test]
fn loading_disables_refresh_and_open() {
    let mut window = window_with(questions(3));
    window.show_loading_state();

    window.refresh();
    window.open_selected();
    assert!(window.take_intents().is_empty());

    window.show_error("Failed to load questions", "timeout");
    window.refresh();
    assert_eq!(window.take_intents(), vec![ListIntent::Refresh]);
}
