//! Fake vehicle REST service for adapter integration tests.
//!
//! Runs a real Actix server on a background thread so the blocking reqwest
//! client under test talks to an actual socket. The server keeps vehicles in
//! memory and records every request it receives.

use std::collections::BTreeMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Map, Number, Value, json};

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: String,
}

#[derive(Debug, Default)]
struct Fleet {
    vehicles: Mutex<BTreeMap<i64, Map<String, Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Fleet {
    fn record(&self, req: &HttpRequest, body: &[u8]) {
        let header_text = |name| {
            req.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        self.requests.lock().expect("requests lock").push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_owned(),
            accept: header_text(header::ACCEPT),
            content_type: header_text(header::CONTENT_TYPE),
            user_agent: header_text(header::USER_AGENT),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
}

/// Handle to a running fake server. Stops the server on drop.
pub struct FakeServer {
    addr: SocketAddr,
    handle: ServerHandle,
    thread: Option<JoinHandle<()>>,
    fleet: Arc<Fleet>,
}

impl FakeServer {
    /// Start a server seeded with the given vehicle objects.
    pub fn start(seed: impl IntoIterator<Item = Value>) -> Self {
        let fleet = Arc::new(Fleet::default());
        {
            let mut vehicles = fleet.vehicles.lock().expect("vehicles lock");
            for value in seed {
                let object = value.as_object().cloned().expect("seed must be an object");
                let id = object["id"].as_i64().expect("seed must carry an id");
                vehicles.insert(id, object);
            }
        }

        let (sender, receiver) = mpsc::channel();
        let data = web::Data::from(Arc::clone(&fleet));
        let thread = thread::spawn(move || {
            actix_rt::System::new().block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake server");
                let addr = listener.local_addr().expect("fake server address");
                let server = HttpServer::new(move || {
                    App::new()
                        .app_data(data.clone())
                        .service(
                            web::resource("/vehicles")
                                .route(web::get().to(list_vehicles))
                                .route(web::post().to(create_vehicle)),
                        )
                        .service(
                            web::resource("/vehicles/{id}")
                                .route(web::get().to(get_vehicle))
                                .route(web::put().to(replace_vehicle))
                                .route(web::delete().to(delete_vehicle)),
                        )
                        .route("/garbled/vehicles", web::get().to(garbled_list))
                        .route("/garbled/vehicles/{id}", web::get().to(garbled_vehicle))
                        .route("/silent/vehicles", web::post().to(silent_create))
                })
                .disable_signals()
                .workers(1)
                .listen(listener)
                .expect("listen on fake server socket")
                .run();

                sender
                    .send((addr, server.handle()))
                    .expect("report fake server address");
                server.await.expect("fake server runs");
            });
        });

        let (addr, handle) = receiver.recv().expect("fake server starts");
        Self {
            addr,
            handle,
            thread: Some(thread),
            fleet,
        }
    }

    /// Base URL of the server, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.fleet.requests.lock().expect("requests lock").clone()
    }

    /// Stored object for `id`, if any.
    pub fn stored(&self, id: i64) -> Option<Map<String, Value>> {
        self.fleet
            .vehicles
            .lock()
            .expect("vehicles lock")
            .get(&id)
            .cloned()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        actix_rt::System::new().block_on(self.handle.stop(false));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// A vehicle object in wire shape.
pub fn vehicle_json(id: i64, color: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "id": id,
        "name": format!("vehicle-{id}"),
        "model": "Transit",
        "year": 2019,
        "color": color,
        "price": 18_000,
        "latitude": latitude,
        "longitude": longitude,
    })
}

fn not_found(id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": format!("vehicle {id} not found") }))
}

fn decode_body(req: &HttpRequest, body: &[u8]) -> Option<Map<String, Value>> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type.starts_with("application/x-www-form-urlencoded") {
        let fields = url::form_urlencoded::parse(body)
            .map(|(key, raw)| {
                let value = match key.as_ref() {
                    "year" => raw.parse::<i64>().map_or(Value::Null, Value::from),
                    "price" => raw.parse::<Number>().map_or(Value::Null, Value::Number),
                    "latitude" | "longitude" => {
                        raw.parse::<f64>().map_or(Value::Null, Value::from)
                    }
                    _ => Value::from(raw.into_owned()),
                };
                (key.into_owned(), value)
            })
            .collect();
        Some(fields)
    } else {
        serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| value.as_object().cloned())
    }
}

async fn list_vehicles(fleet: web::Data<Fleet>, req: HttpRequest) -> HttpResponse {
    fleet.record(&req, &[]);
    let vehicles: Vec<_> = fleet
        .vehicles
        .lock()
        .expect("vehicles lock")
        .values()
        .cloned()
        .collect();
    HttpResponse::Ok().json(vehicles)
}

async fn get_vehicle(
    fleet: web::Data<Fleet>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> HttpResponse {
    fleet.record(&req, &[]);
    let id = id.into_inner();
    match fleet.vehicles.lock().expect("vehicles lock").get(&id) {
        Some(vehicle) => HttpResponse::Ok().json(vehicle),
        None => not_found(id),
    }
}

async fn create_vehicle(
    fleet: web::Data<Fleet>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    fleet.record(&req, &body);
    let Some(mut vehicle) = decode_body(&req, &body) else {
        return HttpResponse::BadRequest().body("expected a vehicle object");
    };
    let mut vehicles = fleet.vehicles.lock().expect("vehicles lock");
    let id = vehicles.keys().next_back().map_or(1, |last| last + 1);
    vehicle.insert("id".to_owned(), Value::from(id));
    vehicles.insert(id, vehicle.clone());
    HttpResponse::Created().json(vehicle)
}

async fn replace_vehicle(
    fleet: web::Data<Fleet>,
    req: HttpRequest,
    id: web::Path<i64>,
    body: web::Bytes,
) -> HttpResponse {
    fleet.record(&req, &body);
    let id = id.into_inner();
    let Some(mut vehicle) = decode_body(&req, &body) else {
        return HttpResponse::BadRequest().body("expected a vehicle object");
    };
    let mut vehicles = fleet.vehicles.lock().expect("vehicles lock");
    let Some(slot) = vehicles.get_mut(&id) else {
        return not_found(id);
    };
    vehicle.insert("id".to_owned(), Value::from(id));
    *slot = vehicle;
    HttpResponse::NoContent().finish()
}

async fn delete_vehicle(
    fleet: web::Data<Fleet>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> HttpResponse {
    fleet.record(&req, &[]);
    let id = id.into_inner();
    match fleet.vehicles.lock().expect("vehicles lock").remove(&id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => not_found(id),
    }
}

async fn garbled_list(fleet: web::Data<Fleet>, req: HttpRequest) -> HttpResponse {
    fleet.record(&req, &[]);
    HttpResponse::Ok()
        .content_type("application/json")
        .body("<html>definitely not json</html>")
}

async fn garbled_vehicle(fleet: web::Data<Fleet>, req: HttpRequest) -> HttpResponse {
    fleet.record(&req, &[]);
    HttpResponse::Ok().json(json!({ "id": 1, "name": "half a vehicle" }))
}

async fn silent_create(
    fleet: web::Data<Fleet>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    fleet.record(&req, &body);
    HttpResponse::Created().finish()
}
