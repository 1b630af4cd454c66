//! DNS Message Builder
//!
//! Constructs TXT query messages in wire format using `hickory-proto`.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use vpcinfo_domain::DomainError;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive TXT query for `name`
    ///
    /// Returns the random message ID alongside the serialized bytes so the
    /// response can be matched against it.
    pub fn build_txt_query(name: &str) -> Result<(u16, Vec<u8>), DomainError> {
        let qname = Name::from_str(name).map_err(|e| {
            DomainError::resolution(name, format!("invalid record name: {}", e))
        })?;

        let mut query = Query::new();
        query.set_name(qname);
        query.set_query_type(RecordType::TXT);
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(name, &message)?;
        Ok((id, bytes))
    }

    fn serialize_message(name: &str, message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::resolution(name, format!("failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
