// One adapter per operation, mirroring the route table. Adapters only
// reshape the transport snapshot into an envelope: no validation, no
// side effects, no collaborator access.
use axum::http::header::AUTHORIZATION;

use crate::dispatch::{Envelope, Payload, Source};

use super::HttpParts;

/// Bearer credential extraction: the second space-delimited segment of
/// the Authorization header. Absent header, or a header without a token
/// segment, yields `token: None` for the gate to reject.
pub fn authenticate_request(req: &HttpParts) -> Envelope {
    let token = req
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(' ').nth(1))
        .filter(|token| !token.is_empty())
        .map(String::from);
    Envelope::new(Source::Http, Payload::AccessToken { token })
}

pub fn list_users_request(_req: &HttpParts) -> Envelope {
    Envelope::new(Source::Http, Payload::UserQuery { id: None })
}

pub fn get_user_by_id_request(req: &HttpParts) -> Envelope {
    Envelope::new(
        Source::Http,
        Payload::UserQuery {
            id: req.path_id.clone(),
        },
    )
}

pub fn update_user_request(req: &HttpParts) -> Envelope {
    Envelope::new(
        Source::Http,
        Payload::UserUpdate {
            id: req.path_id.clone().unwrap_or_default(),
            data: req.body.clone(),
        },
    )
}

pub fn delete_all_users_request(_req: &HttpParts) -> Envelope {
    Envelope::new(Source::Http, Payload::UserDelete { id: None })
}

pub fn delete_user_by_id_request(req: &HttpParts) -> Envelope {
    Envelope::new(
        Source::Http,
        Payload::UserDelete {
            id: req.path_id.clone(),
        },
    )
}

pub fn submit_attendance_request(req: &HttpParts) -> Envelope {
    Envelope::new(
        Source::Http,
        Payload::AttendanceSubmit {
            data: req.body.clone(),
        },
    )
}

pub fn update_attendance_request(req: &HttpParts) -> Envelope {
    Envelope::new(
        Source::Http,
        Payload::AttendanceUpdate {
            id: req.path_id.clone().unwrap_or_default(),
            data: req.body.clone(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use serde_json::{json, Value};

    fn parts(auth: Option<&str>) -> HttpParts {
        let mut headers = HeaderMap::new();
        if let Some(value) = auth {
            headers.insert(AUTHORIZATION, value.parse().unwrap());
        }
        HttpParts::new(headers, None, Value::Null)
    }

    fn token_of(envelope: Envelope) -> Option<String> {
        match envelope.payload {
            Payload::AccessToken { token } => token,
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn extracts_second_segment_of_bearer_header() {
        let envelope = authenticate_request(&parts(Some("Bearer abc.def.ghi")));
        assert_eq!(envelope.source, Source::Http);
        assert_eq!(token_of(envelope).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_yields_no_token() {
        assert_eq!(token_of(authenticate_request(&parts(None))), None);
    }

    #[test]
    fn header_without_token_segment_yields_no_token() {
        assert_eq!(token_of(authenticate_request(&parts(Some("Bearer")))), None);
        assert_eq!(token_of(authenticate_request(&parts(Some("Bearer ")))), None);
    }

    #[test]
    fn op_adapters_carry_exactly_the_operation_inputs() {
        let req = HttpParts::new(
            HeaderMap::new(),
            Some("42".into()),
            json!({ "status": "Out" }),
        );

        assert_eq!(
            list_users_request(&req).payload,
            Payload::UserQuery { id: None }
        );
        assert_eq!(
            get_user_by_id_request(&req).payload,
            Payload::UserQuery { id: Some("42".into()) }
        );
        assert_eq!(
            update_attendance_request(&req).payload,
            Payload::AttendanceUpdate {
                id: "42".into(),
                data: json!({ "status": "Out" }),
            }
        );
    }

    #[test]
    fn source_tag_is_stable_across_adapters() {
        let req = parts(None);
        for adapter in [
            authenticate_request,
            list_users_request,
            get_user_by_id_request,
            update_user_request,
            delete_all_users_request,
            delete_user_by_id_request,
            submit_attendance_request,
            update_attendance_request,
        ] {
            assert_eq!(adapter(&req).source, Source::Http);
        }
    }
}
