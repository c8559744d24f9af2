#![allow(dead_code)]

use std::path::PathBuf;

use learn_core::model::{Lesson, LessonId, Module, ModuleId, Question, QuestionId};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn bundle_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bundle")
}

pub fn module(id: u64, lessons: usize, correct: &[usize]) -> Module {
    let lessons = (0..lessons as u64)
        .map(|i| Lesson::new(LessonId::new(i), format!("Lesson {i}"), format!("<p>Body {i}</p>")))
        .collect();
    let questions = correct
        .iter()
        .zip(0u64..)
        .map(|(&correct, i)| {
            Question::new(
                QuestionId::new(i),
                format!("<p>Question {i}</p>"),
                vec!["a".into(), "b".into(), "c".into()],
                correct,
            )
        })
        .collect();
    Module::new(ModuleId::new(id), format!("Module {id}"), lessons, questions)
}

pub fn feed_json(ids: &[u64]) -> String {
    let modules: Vec<Module> = ids.iter().map(|&id| module(id, 1, &[0])).collect();
    serde_json::to_string(&modules).expect("encode feed")
}

/// Serve exactly one HTTP response on a local port and return the feed URL.
pub async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/data2.json")
}

/// Accept connections on a local port and never answer; returns the feed URL.
pub async fn serve_silently() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}/data2.json")
}
