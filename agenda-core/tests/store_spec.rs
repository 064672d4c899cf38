use speculate2::speculate;

speculate! {
    use agenda_core::models::{Draft, Entity, FormField, Meeting, MeetingField, Note, NoteField};
    use agenda_core::service::fake::{Call, FakeService};
    use agenda_core::service::ServiceError;
    use agenda_core::store::{FormState, RecordStore, StoreError};
    use agenda_core::view::{self, PageView, ViewMode};
    use tokio_test::block_on;

    fn note(id: &str, title: &str, date: &str) -> Note {
        Note {
            id: id.into(),
            title: title.into(),
            content: format!("About {}", title),
            date: date.into(),
            author: "CPC".into(),
        }
    }

    fn meeting(id: &str, starts_at: &str) -> Meeting {
        Meeting {
            id: id.into(),
            title: format!("Meeting {}", id),
            agenda: "Status".into(),
            starts_at: starts_at.into(),
            end_time: "23:00".into(),
            persons: vec!["Ana".into(), "Bo".into()],
        }
    }

    fn note_store(records: Vec<Note>) -> (RecordStore<Note>, FakeService<Note>) {
        let service = FakeService::with_records(records);
        let mut store = RecordStore::new();
        block_on(store.load(&service));
        (store, service)
    }

    describe "saving a draft" {
        it "never calls the service for a draft missing any required field" {
            for missing in NoteField::ALL {
                let (mut store, service) = note_store(Vec::new());
                store.begin_create().unwrap();
                for field in NoteField::ALL {
                    if field != missing {
                        let value = if *field == NoteField::Date { "2024-03-01" } else { "filled" };
                        store.update_draft_field(*field, value).unwrap();
                    }
                }

                let result = block_on(store.save(&service));

                assert!(matches!(result, Err(StoreError::Invalid(1))), "missing {}", missing);
                assert!(store.error(*missing).is_some());
                assert!(service.mutating_calls().is_empty());
                assert_eq!(store.form_state(), FormState::OpenCreate);
            }
        }

        it "issues exactly one create for a new valid note" {
            let (mut store, service) = note_store(vec![note("1", "Kickoff", "2024-01-10")]);

            store.begin_create().unwrap();
            store.update_draft_field(NoteField::Title, "Q1 Review").unwrap();
            store.update_draft_field(NoteField::Content, "Budget discussion").unwrap();
            store.update_draft_field(NoteField::Date, "2024-03-01").unwrap();
            store.update_draft_field(NoteField::Author, "CPC").unwrap();
            assert!(store.draft().unwrap().validate().is_empty());

            block_on(store.save(&service)).unwrap();

            assert_eq!(service.mutating_calls(), vec![Call::Create]);
            assert_eq!(store.records().len(), 2);
            let created = store
                .records()
                .iter()
                .find(|n| n.title == "Q1 Review")
                .unwrap();
            assert_eq!(created.content, "Budget discussion");
            assert_eq!(created.date, "2024-03-01");
            assert_eq!(created.author, "CPC");
            assert_eq!(store.form_state(), FormState::Closed);
        }

        it "issues exactly one update for an edited note" {
            let (mut store, service) = note_store(vec![note("1", "Kickoff", "2024-01-10")]);

            store.begin_edit("1").unwrap();
            store.update_draft_field(NoteField::Content, "Agreed scope").unwrap();
            block_on(store.save(&service)).unwrap();

            assert_eq!(service.mutating_calls(), vec![Call::Update("1".into())]);
            assert_eq!(store.find("1").unwrap().content, "Agreed scope");
        }

        it "rejects a meeting without participants without a call" {
            let service = FakeService::<Meeting>::new();
            let mut store = RecordStore::<Meeting>::new();
            store.begin_create().unwrap();
            store.update_draft_field(MeetingField::Title, "Planning").unwrap();
            store.update_draft_field(MeetingField::Agenda, "Roadmap").unwrap();
            store.update_draft_field(MeetingField::Date, "2024-03-04").unwrap();
            store.update_draft_field(MeetingField::StartTime, "10:00").unwrap();
            store.update_draft_field(MeetingField::EndTime, "11:00").unwrap();

            assert!(block_on(store.save(&service)).is_err());
            assert_eq!(
                store.error(MeetingField::Persons),
                Some("At least one participant is required")
            );
            assert_eq!(store.errors().unwrap().len(), 1);
            assert!(service.calls().is_empty());
            assert_eq!(store.form_state(), FormState::OpenCreate);
        }
    }

    describe "editing round trip" {
        it "leaves an unchanged note equal to the original" {
            let original = note("7", "Retro", "2024-02-02");
            let (mut store, service) = note_store(vec![original.clone()]);

            store.begin_edit("7").unwrap();
            block_on(store.save(&service)).unwrap();

            assert_eq!(store.find("7"), Some(&original));
        }

        it "leaves an unchanged meeting equal to the original" {
            let original = meeting("m1", "2024-03-01T09:30");
            let service = FakeService::with_records(vec![original.clone()]);
            let mut store = RecordStore::<Meeting>::new();
            block_on(store.load(&service));

            store.begin_edit("m1").unwrap();
            assert_eq!(store.draft().unwrap().date, "2024-03-01");
            assert_eq!(store.draft().unwrap().start_time, "09:30");
            block_on(store.save(&service)).unwrap();

            assert_eq!(store.find("m1"), Some(&original));
        }

        it "keeps participant names that contain commas" {
            let mut original = meeting("m2", "2024-03-01T09:30");
            original.persons = vec!["Smith, J.".into(), "Ana".into()];
            let service = FakeService::with_records(vec![original.clone()]);
            let mut store = RecordStore::<Meeting>::new();
            block_on(store.load(&service));

            store.begin_edit("m2").unwrap();
            block_on(store.save(&service)).unwrap();

            assert_eq!(store.find("m2"), Some(&original));
            assert_eq!(service.records()[0].persons, original.persons);
        }

        it "keeps surrounding whitespace in note text" {
            let mut original = note("8", "Retro ", "2024-02-02");
            original.content = "  indented\n".into();
            let (mut store, service) = note_store(vec![original.clone()]);

            store.begin_edit("8").unwrap();
            block_on(store.save(&service)).unwrap();

            assert_eq!(store.find("8"), Some(&original));
        }
    }

    describe "deleting" {
        it "removes every trace of the id on success" {
            let (mut store, service) = note_store(vec![
                note("1", "a", "2024-01-01"),
                note("2", "b", "2024-01-02"),
            ]);

            block_on(store.delete("2", &service)).unwrap();

            assert!(store.records().iter().all(|n| n.id() != "2"));
            assert_eq!(service.mutating_calls(), vec![Call::Delete("2".into())]);
        }

        it "keeps the list unchanged on failure" {
            let (mut store, service) = note_store(vec![
                note("1", "a", "2024-01-01"),
                note("2", "b", "2024-01-02"),
            ]);
            let before = store.records().to_vec();
            service.fail_with(ServiceError::Status(503));

            let result = block_on(store.delete("2", &service));

            assert!(matches!(result, Err(StoreError::Service(ServiceError::Status(503)))));
            assert_eq!(store.records(), before.as_slice());
        }
    }

    describe "rendering order" {
        it "puts later meetings first in every view mode" {
            let meetings = vec![
                meeting("a", "2024-01-05T08:00"),
                meeting("b", "2024-03-01T12:00"),
                meeting("c", "2024-03-01T09:00"),
                meeting("d", "2023-12-31T23:59"),
            ];

            for mode in [ViewMode::Grid, ViewMode::List] {
                let ordered = view::arrange(&meetings);
                for pair in ordered.windows(2) {
                    assert!(pair[0].timestamp() >= pair[1].timestamp());
                }

                let PageView::Cards(cards) = view::page(&meetings, mode) else {
                    panic!("expected cards");
                };
                let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids, vec!["b", "c", "a", "d"]);
            }
        }
    }
}
