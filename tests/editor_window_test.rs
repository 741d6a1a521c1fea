mod common;

use audition_admin::models::{ConceptType, ImageTarget, ProcessType};
use audition_admin::views::{EditorField, EditorIntent, NotificationLevel, SubQuestionEditWindow, Window};
use common::question;
use std::path::PathBuf;
use std::time::Duration;

fn editor(question_id: i64, sub_count: usize) -> SubQuestionEditWindow {
    let mut window = SubQuestionEditWindow::new(question_id, 0, Duration::from_secs(3));
    window.show_loading_state();
    window.set_question_data(question(question_id, sub_count));
    window
}

#[test]
fn sub_question_navigation_stops_at_bounds() {
    for count in 1..=6 {
        let mut window = editor(3, count);
        assert!(!window.has_prev_sub_question());

        for expected in 1..count {
            assert!(window.has_next_sub_question());
            window.next_sub_question();
            assert_eq!(window.sub_question_index(), expected);
        }

        assert_eq!(window.sub_question_index(), count - 1);
        assert!(!window.has_next_sub_question());
        window.next_sub_question();
        assert_eq!(window.sub_question_index(), count - 1);

        for _ in 0..count {
            window.prev_sub_question();
        }
        assert_eq!(window.sub_question_index(), 0);
        assert!(!window.has_prev_sub_question());
    }
}

#[test]
fn navigation_repopulates_form_and_drops_draft() {
    let mut window = editor(2, 2);
    window.form_mut().answer = "unsaved".to_string();

    window.next_sub_question();

    assert_eq!(window.form().answer, "answer 21");
    assert_eq!(window.title(), "Edit Sub-Question 2 of 2");
}

#[test]
fn empty_question_is_a_load_error() {
    let window = editor(4, 0);

    assert_eq!(window.load_error(), Some("No sub-questions available"));
    assert_eq!(window.notification().unwrap().level, NotificationLevel::Error);
    assert!(!window.has_next_sub_question());
    assert!(!window.has_prev_sub_question());
    assert!(window.to_draft().is_none());
}

#[test]
fn reload_keeps_cursor_within_bounds() {
    let mut window = editor(1, 3);
    window.next_sub_question();
    window.next_sub_question();

    window.set_question_data(question(1, 3));
    assert_eq!(window.sub_question_index(), 2);

    window.set_question_data(question(1, 2));
    assert_eq!(window.sub_question_index(), 1);
}

#[test]
fn previous_question_requires_id_above_one() {
    let mut first = editor(1, 1);
    assert!(!first.has_prev_question());
    first.prev_question();
    assert!(first.take_intents().is_empty());

    let mut second = editor(2, 1);
    assert!(second.has_prev_question());
    second.prev_question();
    second.next_question();
    assert_eq!(
        second.take_intents(),
        vec![
            EditorIntent::NavigateQuestion { question_id: 1 },
            EditorIntent::NavigateQuestion { question_id: 3 },
        ]
    );
}

#[test]
fn sub_question_with_image_requests_it() {
    let mut data = question(1, 2);
    data.sub_questions[1].image_id = Some(9);
    let mut window = SubQuestionEditWindow::new(1, 0, Duration::from_secs(3));
    window.set_question_data(data);
    assert!(window.take_intents().is_empty());

    window.next_sub_question();
    assert_eq!(
        window.take_intents(),
        vec![EditorIntent::LoadImage { image_id: 9 }]
    );
}

#[test]
fn stale_image_is_ignored() {
    let mut data = question(1, 1);
    data.sub_questions[0].image_id = Some(9);
    let mut window = SubQuestionEditWindow::new(1, 0, Duration::from_secs(3));
    window.set_question_data(data);

    assert!(!window.set_image(8, b"other".to_vec(), "other".to_string()));
    assert!(window.form().image_preview.is_none());

    assert!(window.set_image(9, b"mine".to_vec(), "mine".to_string()));
    assert_eq!(window.form().image_description, "mine");

    window.remove_image();
    assert!(!window.set_image(9, b"late".to_vec(), "late".to_string()));
    let draft = window.to_draft().unwrap();
    assert_eq!(draft.image_id, None);
    assert_eq!(draft.image_description, None);
}

#[test]
fn upload_validates_path() {
    let mut window = editor(1, 1);

    window.request_upload("   ");
    assert_eq!(window.notification().unwrap().message, "Failed to load image");

    window.request_upload("/tmp/figure.gif");
    assert_eq!(
        window.notification().unwrap().message,
        "Only PNG or JPG images are supported"
    );
    assert!(window.take_intents().is_empty());

    window.request_upload("/tmp/figure.JPEG");
    assert_eq!(
        window.take_intents(),
        vec![EditorIntent::UploadImage {
            file_path: PathBuf::from("/tmp/figure.JPEG"),
            target: ImageTarget::New,
            sub_question_id: 10,
            description: String::new(),
        }]
    );
}

#[test]
fn upload_replaces_existing_image() {
    let mut data = question(1, 1);
    data.sub_questions[0].image_id = Some(9);
    let mut window = SubQuestionEditWindow::new(1, 0, Duration::from_secs(3));
    window.set_question_data(data);
    window.take_intents();

    window.form_mut().upload_path = "scan.png".to_string();
    window.submit_upload_path();

    match window.take_intents().as_slice() {
        [EditorIntent::UploadImage { target, .. }] => {
            assert_eq!(*target, ImageTarget::Existing(9))
        }
        other => panic!("unexpected intents: {:?}", other),
    }
    assert!(window.form().upload_path.is_empty());
}

#[test]
fn uploaded_image_is_loaded() {
    let mut window = editor(1, 1);

    window.show_uploading_state();
    window.on_image_uploaded(55);

    assert!(window.form_enabled());
    assert_eq!(window.form().image_id, Some(55));
    assert_eq!(
        window.take_intents(),
        vec![EditorIntent::LoadImage { image_id: 55 }]
    );
    assert_eq!(
        window.notification().unwrap().message,
        "Image uploaded successfully"
    );
}

#[test]
fn approval_only_flips_matching_question() {
    let mut window = editor(5, 1);
    assert!(window.can_approve());

    window.on_question_approved(6);
    assert!(window.can_approve());

    window.on_question_approved(5);
    assert!(!window.can_approve());
    window.approve();
    assert!(window.take_intents().is_empty());

    window.on_question_deleted(5);
    assert!(!window.can_delete());
}

#[test]
fn save_builds_draft_from_form() {
    let mut window = editor(1, 1);
    {
        let form = window.form_mut();
        form.keywords = " ratio , , scale ".to_string();
        form.options = "A. 1\n\nB. 2\n".to_string();
    }
    window.set_focus(EditorField::Concept);
    window.cycle_next();
    window.set_focus(EditorField::Process);
    window.cycle_prev();

    window.save();

    match window.take_intents().as_slice() {
        [EditorIntent::Save { draft }] => {
            assert_eq!(draft.question_id, 1);
            assert_eq!(draft.sub_question_id, 10);
            assert_eq!(draft.keywords, vec!["ratio", "scale"]);
            assert_eq!(draft.options, vec!["A. 1", "B. 2"]);
            assert_eq!(draft.concept, ConceptType::StatisticsAndData);
            assert_eq!(draft.process, ProcessType::Formulate);
        }
        other => panic!("unexpected intents: {:?}", other),
    }
}

#[test]
fn save_outcomes_update_window() {
    let mut window = editor(1, 1);

    window.show_saving_state();
    assert_eq!(window.busy_label(), Some("Saving"));
    assert!(!window.form_enabled());
    window.save();
    assert!(window.take_intents().is_empty());

    window.on_save_error("conflict");
    assert!(window.form_enabled());
    assert_eq!(window.notification().unwrap().title, "Save Failed");

    window.on_save_success();
    assert_eq!(window.notification().unwrap().message, "Saved successfully");
    assert_eq!(
        window.take_intents(),
        vec![EditorIntent::ReloadQuestion { question_id: 1 }]
    );
}

#[test]
fn typing_goes_to_focused_field() {
    let mut window = editor(1, 1);
    window.set_focus(EditorField::Answer);

    window.backspace();
    window.input_char('!');
    window.input_newline();

    assert_eq!(window.form().answer, "answer 1!\n");

    window.set_focus(EditorField::ImageDescription);
    window.input_char('x');
    assert_eq!(window.form().image_description, "");
}

#[test]
fn unloaded_image_description_is_left_out_of_draft() {
    let mut data = question(1, 1);
    data.sub_questions[0].image_id = Some(9);
    let mut window = SubQuestionEditWindow::new(1, 0, Duration::from_secs(3));
    window.set_question_data(data);
    window.show_loading_state();

    window.show_error("Failed to load image", "timeout");
    assert!(window.form_enabled());
    assert!(!window.image_description_loaded());

    // 描述未加载时输入被忽略，草稿不携带描述
    window.set_focus(EditorField::ImageDescription);
    window.input_char('x');
    let draft = window.to_draft().unwrap();
    assert_eq!(draft.image_id, Some(9));
    assert_eq!(draft.image_description, None);

    assert!(window.set_image(9, b"chart".to_vec(), "old chart".to_string()));
    window.input_char('!');
    assert_eq!(
        window.to_draft().unwrap().image_description.as_deref(),
        Some("old chart!")
    );
}

#[test]
fn uploaded_image_description_waits_for_reload() {
    let mut data = question(1, 1);
    data.sub_questions[0].image_id = Some(9);
    let mut window = SubQuestionEditWindow::new(1, 0, Duration::from_secs(3));
    window.set_question_data(data);
    window.set_image(9, b"chart".to_vec(), "old chart".to_string());

    window.on_image_uploaded(12);

    assert!(window.form().image_preview.is_none());
    assert_eq!(window.to_draft().unwrap().image_description, None);
}
