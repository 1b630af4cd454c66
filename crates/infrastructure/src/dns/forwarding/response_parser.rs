use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use tracing::debug;
use vpcinfo_domain::DomainError;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes a TXT answer for `record`.
    ///
    /// Each TXT record yields one value, its character-strings concatenated.
    /// Values keep answer order. A `NOERROR` response without TXT answers is
    /// an empty success.
    pub fn parse_txt(
        record: &str,
        response_bytes: &[u8],
        expected_id: u16,
    ) -> Result<Vec<String>, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::resolution(record, format!("failed to parse DNS response: {}", e))
        })?;

        if message.id() != expected_id {
            return Err(DomainError::resolution(
                record,
                format!(
                    "response id {} does not match query id {}",
                    message.id(),
                    expected_id
                ),
            ));
        }

        let rcode = message.response_code();
        match rcode {
            ResponseCode::NoError => {}
            ResponseCode::NXDomain => return Err(DomainError::NotFound(record.to_string())),
            other => return Err(DomainError::resolution(record, Self::rcode_to_status(other))),
        }

        if message.truncated() {
            return Err(DomainError::resolution(record, "truncated response"));
        }

        let values: Vec<String> = message
            .answers()
            .iter()
            .filter_map(|answer| match answer.data() {
                RData::TXT(txt) => Some(txt.to_string()),
                _ => None,
            })
            .collect();

        debug!(
            record = %record,
            rcode = ?rcode,
            answers = message.answers().len(),
            values = values.len(),
            "TXT response parsed"
        );

        Ok(values)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
