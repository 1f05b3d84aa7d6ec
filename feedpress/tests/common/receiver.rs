// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request seen by the stand-in worker.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub source: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct WorkerReceiver {
    pub url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl WorkerReceiver {
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.captured.lock().expect("captured lock").clone()
    }

    /// Polls until `count` requests arrived or two seconds pass.
    pub async fn wait_for(&self, count: usize) -> Vec<CapturedRequest> {
        for _ in 0..40 {
            let captured = self.captured();
            if captured.len() >= count {
                return captured;
            }
            actix_web::rt::time::sleep(Duration::from_millis(50)).await;
        }
        self.captured()
    }
}

/// Starts a worker stand-in on an ephemeral port answering every POST with `status`.
pub async fn start_worker_receiver(status: StatusCode) -> WorkerReceiver {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let captured = Arc::new(Mutex::new(Vec::new()));

    let sink = captured.clone();
    actix_web::rt::spawn(async move {
        let _ = HttpServer::new(move || {
            let sink = sink.clone();
            actix_web::App::new().default_service(web::to(
                move |req: HttpRequest, body: web::Bytes| {
                    let sink = sink.clone();
                    async move {
                        let header = |name: &str| {
                            req.headers()
                                .get(name)
                                .and_then(|value| value.to_str().ok())
                                .map(str::to_string)
                        };
                        let captured = CapturedRequest {
                            authorization: header("authorization"),
                            source: header("x-webhook-source"),
                            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                        };
                        sink.lock().expect("captured lock").push(captured);
                        HttpResponse::build(status).finish()
                    }
                },
            ))
        })
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run()
        .await;
    });

    WorkerReceiver {
        url: format!("http://{}/hooks/article", addr),
        captured,
    }
}
