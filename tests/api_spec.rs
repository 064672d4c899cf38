use speculate2::speculate;

speculate! {
    use agenda::api::create_router;
    use agenda_core::models::{Meeting, Note};
    use agenda_core::Database;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use tokio_test::block_on;

    fn setup_server() -> TestServer {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate test database");
        TestServer::new(create_router(db)).expect("Failed to start test server")
    }

    fn note_body(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "content": "Budget discussion",
            "date": "2024-03-01",
            "author": "CPC"
        })
    }

    describe "notes" {
        it "starts with an empty array" {
            block_on(async {
                let server = setup_server();
                let response = server.get("/notes").await;
                response.assert_status_ok();
                assert_eq!(response.json::<Vec<Note>>(), Vec::<Note>::new());
            });
        }

        it "creates, lists, updates and deletes" {
            block_on(async {
                let server = setup_server();

                let created = server.post("/notes").json(&note_body("Q1 Review")).await;
                created.assert_status(StatusCode::CREATED);
                let note = created.json::<Note>();
                assert!(!note.id.is_empty());
                assert_eq!(note.title, "Q1 Review");

                let listed = server.get("/notes").await.json::<Vec<Note>>();
                assert_eq!(listed, vec![note.clone()]);

                let updated = server
                    .put(&format!("/notes/{}", note.id))
                    .json(&note_body("Q1 Review (final)"))
                    .await;
                updated.assert_status_ok();
                assert_eq!(updated.json::<Note>().title, "Q1 Review (final)");

                server
                    .delete(&format!("/notes/{}", note.id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                assert!(server.get("/notes").await.json::<Vec<Note>>().is_empty());
            });
        }

        it "accepts the legacy createdBy field" {
            block_on(async {
                let server = setup_server();
                let body = json!({
                    "title": "t", "content": "c", "date": "2024-03-01", "createdBy": "CPC"
                });

                let response = server.post("/notes").json(&body).await;
                response.assert_status(StatusCode::CREATED);
                assert_eq!(response.json::<Note>().author, "CPC");
            });
        }

        it "answers 404 for unknown ids" {
            block_on(async {
                let server = setup_server();

                server
                    .put("/notes/missing")
                    .json(&note_body("x"))
                    .expect_failure()
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .delete("/notes/missing")
                    .expect_failure()
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            });
        }
    }

    describe "meetings" {
        it "round trips participants and the combined start" {
            block_on(async {
                let server = setup_server();
                let body = json!({
                    "title": "Planning",
                    "agenda": "Roadmap",
                    "meetingdatetime": "2024-03-04T10:00",
                    "endtime": "11:00",
                    "persons": ["Ana", "Bo"]
                });

                let created = server.post("/meetings").json(&body).await;
                created.assert_status(StatusCode::CREATED);
                let meeting = created.json::<Meeting>();

                let listed = server.get("/meetings").await.json::<Vec<Meeting>>();
                assert_eq!(listed.len(), 1);
                assert_eq!(listed[0].persons, vec!["Ana", "Bo"]);
                assert_eq!(listed[0].starts_at, "2024-03-04T10:00");
                assert_eq!(listed[0].id, meeting.id);
            });
        }

        it "rejects bodies that are not meetings" {
            block_on(async {
                let server = setup_server();
                let response = server
                    .post("/meetings")
                    .json(&json!({ "title": "no schedule" }))
                    .expect_failure()
                    .await;
                assert!(response.status_code().is_client_error());
            });
        }
    }
}
