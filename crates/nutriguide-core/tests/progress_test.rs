//! Integration tests for progress logging through the controller.

use std::sync::Arc;

use nutriguide_core::controller::AppController;
use nutriguide_core::generate::Generator;
use nutriguide_core::progress::{HISTORY_LIMIT, ProgressLogger};
use nutriguide_store::{FileStore, KeyValueStore};
use nutriguide_store::slots::{HISTORY_KEY, Slots};
use nutriguide_test_utils::{MockGenerationService, memory_slots};

#[test]
fn eleven_entries_keep_the_latest_ten() {
    let (_, slots) = memory_slots();
    let mut logger = ProgressLogger::load(slots.clone()).unwrap();

    for day in 1..=11 {
        logger.form_mut().set_weight(format!("{}", 70 - day));
        logger
            .submit_on(format!("01/{day:02}/2025"))
            .unwrap()
            .expect("valid weight is recorded");
    }

    let history = logger.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0].date, "01/11/2025");
    assert_eq!(history[0].weight, 59.0);
    assert_eq!(history[9].date, "01/02/2025");

    let stored = slots.load_history().unwrap();
    assert_eq!(stored, history);
}

#[test]
fn empty_weight_leaves_history_unchanged() {
    let (store, slots) = memory_slots();
    let mut logger = ProgressLogger::load(slots).unwrap();
    logger.form_mut().set_weight("65");
    logger.submit_on("01/01/2025").unwrap();
    let before = logger.history().to_vec();

    logger.form_mut().set_weight("  ");
    assert_eq!(logger.submit_on("01/02/2025").unwrap(), None);
    logger.form_mut().set_weight("heavy");
    assert_eq!(logger.submit_on("01/02/2025").unwrap(), None);

    assert_eq!(logger.history(), before.as_slice());
    let raw = store.get(HISTORY_KEY).unwrap().unwrap();
    assert_eq!(raw.matches("\"date\"").count(), 1);
}

#[test]
fn history_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let slots = Slots::new(Arc::new(FileStore::open_dir(dir.path()).unwrap()));
        let mut controller =
            AppController::load(slots, Generator::new(Arc::new(MockGenerationService::empty())))
                .unwrap();
        let progress = controller.progress_mut();
        progress.form_mut().set_weight("61.2");
        progress.form_mut().set_mood(4);
        progress.form_mut().set_adherence(90);
        progress.submit_on("03/04/2025").unwrap();
    }

    let slots = Slots::new(Arc::new(FileStore::open_dir(dir.path()).unwrap()));
    let controller =
        AppController::load(slots, Generator::new(Arc::new(MockGenerationService::empty())))
            .unwrap();
    let history = controller.progress().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].weight, 61.2);
    assert_eq!(history[0].mood, 4);
    assert_eq!(history[0].adherence, 90);
}
