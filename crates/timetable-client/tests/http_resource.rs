//! HTTP contract tests for `ResourceClient` against a mock backend

use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use timetable_client::{ApiClient, Resource};
use timetable_types::{
	ApiErrorKind, CONNECTION_ERROR_MESSAGE, ListQuery, Professor, Subject, UNKNOWN_ERROR_MESSAGE,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
	ApiClient::new(format!("{}/api", server.uri())).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_fetch_page_sends_query_parameters() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/materia"))
		.and(query_param("page_number", "2"))
		.and(query_param("page_size", "5"))
		.and(query_param("filter", "alg"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"page_number": 2,
			"page_size": 5,
			"total_items": 6,
			"items": [{ "id": 6, "nome": "Algebra II" }]
		})))
		.expect(1)
		.mount(&server)
		.await;
	let subjects = client_for(&server).await.resource::<Subject>();

	// Act
	let page = subjects
		.fetch_page(&ListQuery::new(2, 5, "alg"))
		.await
		.unwrap();

	// Assert
	assert_eq!(page.total_items, 6);
	assert_eq!(page.total_pages(), 2);
	assert_eq!(page.items[0].name, "Algebra II");
}

#[rstest]
#[tokio::test]
async fn test_fetch_all_and_by_id() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/professor/all"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([
			{ "id": 1, "nome": "Ada", "materias": [{ "id": 3, "nome": "Logic" }] },
			{ "id": 2, "nome": "Alan" }
		])))
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/api/professor/2"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 2, "nome": "Alan" })))
		.mount(&server)
		.await;
	let professors = client_for(&server).await.resource::<Professor>();

	// Act
	let all = professors.fetch_all().await.unwrap();
	let one = professors.fetch_by_id(2).await.unwrap();

	// Assert
	assert_eq!(all.len(), 2);
	assert!(all[0].teaches(3));
	assert_eq!(one.name, "Alan");
}

#[rstest]
#[tokio::test]
async fn test_create_posts_to_trailing_slash() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/materia/"))
		.and(body_json(json!({ "nome": "Music", "professores": [], "horarios": [] })))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "nome": "Music" })))
		.expect(1)
		.mount(&server)
		.await;
	let subjects = client_for(&server).await.resource::<Subject>();

	// Act
	let created = subjects.create(&Subject::new("Music")).await.unwrap();

	// Assert
	assert_eq!(created.id, Some(9));
}

#[rstest]
#[tokio::test]
async fn test_update_delete_and_count() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("PUT"))
		.and(path("/api/materia/4"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 4, "nome": "Art" })))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("DELETE"))
		.and(path("/api/materia/4"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/api/materia/count"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 17 })))
		.expect(1)
		.mount(&server)
		.await;
	let subjects = client_for(&server).await.resource::<Subject>();

	// Act
	let updated = subjects.update(4, &Subject::new("Art")).await.unwrap();
	subjects.delete(4).await.unwrap();
	let count = subjects.count().await.unwrap();

	// Assert
	assert_eq!(updated.name, "Art");
	assert_eq!(count, 17);
}

#[rstest]
#[tokio::test]
async fn test_backend_message_is_passed_through() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("DELETE"))
		.and(path("/api/materia/1"))
		.respond_with(
			ResponseTemplate::new(409)
				.set_body_json(json!({ "message": "Subject is used by a class" })),
		)
		.mount(&server)
		.await;
	let subjects = client_for(&server).await.resource::<Subject>();

	// Act
	let err = subjects.delete(1).await.unwrap_err();

	// Assert
	assert_eq!(err.kind(), ApiErrorKind::Backend);
	assert_eq!(err.to_string(), "Subject is used by a class");
}

#[rstest]
#[case(ResponseTemplate::new(500).set_body_string("Internal Server Error"))]
#[case(ResponseTemplate::new(200).set_body_string("not json"))]
#[tokio::test]
async fn test_unexplained_failures_are_unknown(#[case] response: ResponseTemplate) {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/materia/count"))
		.respond_with(response)
		.mount(&server)
		.await;
	let subjects = client_for(&server).await.resource::<Subject>();

	// Act
	let err = subjects.count().await.unwrap_err();

	// Assert
	assert_eq!(err.kind(), ApiErrorKind::Unknown);
	assert_eq!(err.message(), UNKNOWN_ERROR_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn test_unreachable_backend_is_connection_error() {
	// Arrange
	// Bind then release a port so nothing listens on it
	let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
	let base = format!("http://{}/api", listener.local_addr().unwrap());
	drop(listener);
	let subjects = ApiClient::with_timeout(base, Duration::from_secs(2))
		.unwrap()
		.resource::<Subject>();

	// Act
	let err = subjects.fetch_all().await.unwrap_err();

	// Assert
	assert_eq!(err.kind(), ApiErrorKind::Connection);
	assert_eq!(err.message(), CONNECTION_ERROR_MESSAGE);
}
