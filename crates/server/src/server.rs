use std::io::Read;
use std::time::Instant;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server};

use facematch_core::pipeline::compare_faces_use_case::CompareFacesUseCase;
use facematch_core::pipeline::comparison_request::ComparisonRequest;

use crate::api::{CompareFacesResponse, ServerError};

const COMPARE_FACES_PATH: &str = "/compare_faces";

/// Largest request body accepted; a comparison request is two identifiers.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Status code and JSON body of one response.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Reply {
    fn json(status: u16, body: &impl Serialize) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|e| {
            log::error!("Could not serialize response: {e}");
            serde_json::Value::Null
        });
        Self { status, body }
    }

    fn error(err: &ServerError) -> Self {
        Self::json(err.status(), &err.body())
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response =
            Response::from_string(self.body.to_string()).with_status_code(self.status);
        if let Ok(header) = "Content-Type: application/json".parse::<Header>() {
            response = response.with_header(header);
        }
        if self.status == 405 {
            if let Ok(header) = "Allow: POST".parse::<Header>() {
                response = response.with_header(header);
            }
        }
        response
    }
}

/// Binds `addr` and serves requests one at a time until the process ends.
pub fn serve(addr: &str, use_case: &mut CompareFacesUseCase) -> Result<(), ServerError> {
    let server = Server::http(addr).map_err(|e| ServerError::Bind {
        addr: addr.to_string(),
        reason: e.to_string(),
    })?;
    log::info!("Listening on http://{addr}");

    for request in server.incoming_requests() {
        handle(request, use_case);
    }
    Ok(())
}

/// Answers one HTTP request. Failures to respond are logged; the client
/// has gone away and there is nobody left to tell.
pub fn handle(mut request: Request, use_case: &mut CompareFacesUseCase) {
    let started = Instant::now();
    let reply = match read_body(request.as_reader(), MAX_BODY_BYTES) {
        Ok(body) => dispatch(request.method(), request.url(), &body, use_case),
        Err(e) => {
            log::warn!("{e}");
            Reply::error(&e)
        }
    };

    log::info!(
        "{} {} -> {} ({:.2}s)",
        request.method(),
        request.url(),
        reply.status,
        started.elapsed().as_secs_f64()
    );
    if let Err(e) = request.respond(reply.into_response()) {
        log::warn!("Could not send response: {e}");
    }
}

/// Reads at most `limit` bytes; anything longer is rejected without being
/// buffered.
fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, ServerError> {
    let mut body = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(ServerError::UnreadableBody)?;
    if body.len() as u64 > limit {
        return Err(ServerError::BodyTooLarge { limit });
    }
    Ok(body)
}

/// Routes a request to the use case and renders the outcome.
pub fn dispatch(
    method: &Method,
    url: &str,
    body: &[u8],
    use_case: &mut CompareFacesUseCase,
) -> Reply {
    match route(method, url, body, use_case) {
        Ok(response) => Reply::json(200, &response),
        Err(e) => {
            if e.status() >= 500 {
                log::error!("{e}");
            } else {
                log::warn!("{e}");
            }
            Reply::error(&e)
        }
    }
}

fn route(
    method: &Method,
    url: &str,
    body: &[u8],
    use_case: &mut CompareFacesUseCase,
) -> Result<CompareFacesResponse, ServerError> {
    let path = url.split('?').next().unwrap_or(url);
    if path.trim_end_matches('/') != COMPARE_FACES_PATH {
        return Err(ServerError::NotFound);
    }
    if *method != Method::Post {
        return Err(ServerError::MethodNotAllowed);
    }

    let request: ComparisonRequest = serde_json::from_slice(body)?;
    let result = use_case.execute(&request)?;
    Ok(result.into())
}
