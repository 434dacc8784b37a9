//! OSC wire codec.
//!
//! Thin layer over [`rosc`] that fixes the two conversions the bridge needs:
//! an outbound packet to a UDP payload, and a UDP payload to the ordered
//! messages it carries.
//!
//! ```text
//! Message = address (NUL, pad 4) + ",tags" (NUL, pad 4) + args (big-endian, 4-aligned)
//! Bundle  = "#bundle\0" + time tag (8) + { size (4) + element }*
//! ```

use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

use crate::core::CodecError;

/// Time tag meaning "process immediately".
pub const IMMEDIATELY: OscTime = OscTime {
    seconds: 0,
    fractional: 1,
};

/// Encode a message or bundle into a datagram payload.
pub fn encode(packet: &OscPacket) -> Result<Vec<u8>, CodecError> {
    rosc::encoder::encode(packet).map_err(|e| CodecError::Encode(format!("{e:?}")))
}

/// Decode a datagram into its messages, in wire order.
///
/// Bundles (including nested ones) are flattened element by element.
pub fn decode(datagram: &[u8]) -> Result<Vec<OscMessage>, CodecError> {
    let (_, packet) =
        rosc::decoder::decode_udp(datagram).map_err(|e| CodecError::Decode(format!("{e:?}")))?;
    let mut messages = Vec::new();
    flatten_into(packet, &mut messages);
    Ok(messages)
}

fn flatten_into(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(message) => out.push(message),
        OscPacket::Bundle(bundle) => {
            for element in bundle.content {
                flatten_into(element, out);
            }
        }
    }
}

/// Build a message from an address and arguments.
pub fn message(addr: impl Into<String>, args: Vec<OscType>) -> OscMessage {
    OscMessage {
        addr: addr.into(),
        args,
    }
}

/// Wrap messages into an immediate bundle, preserving order.
pub fn bundle(messages: Vec<OscMessage>) -> OscPacket {
    OscPacket::Bundle(OscBundle {
        timetag: IMMEDIATELY,
        content: messages.into_iter().map(OscPacket::Message).collect(),
    })
}

/// Float arguments, in order.
pub fn floats(values: &[f32]) -> Vec<OscType> {
    values.iter().copied().map(OscType::Float).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roundtrip_all_scalars() {
        let original = message(
            "/VMC/Ext/Bone/Pos",
            vec![
                OscType::String("LeftHand".into()),
                OscType::Int(-42),
                OscType::Float(1.25),
            ],
        );
        let bytes = encode(&OscPacket::Message(original.clone())).unwrap();
        assert_eq!(bytes.len() % 4, 0);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, vec![original]);
    }

    #[test]
    fn test_bundle_flattens_in_order() {
        let messages: Vec<_> = (0..5)
            .map(|i| message(format!("/m/{i}"), vec![OscType::Int(i)]))
            .collect();
        let bytes = encode(&bundle(messages.clone())).unwrap();
        assert!(bytes.starts_with(b"#bundle\0"));

        assert_eq!(decode(&bytes).unwrap(), messages);
    }

    #[test]
    fn test_nested_bundle_flattens_depth_first() {
        let inner = OscPacket::Bundle(OscBundle {
            timetag: IMMEDIATELY,
            content: vec![
                OscPacket::Message(message("/b", vec![])),
                OscPacket::Message(message("/c", vec![])),
            ],
        });
        let outer = OscPacket::Bundle(OscBundle {
            timetag: IMMEDIATELY,
            content: vec![
                OscPacket::Message(message("/a", vec![])),
                inner,
                OscPacket::Message(message("/d", vec![])),
            ],
        });
        let bytes = encode(&outer).unwrap();
        let addrs: Vec<_> = decode(&bytes).unwrap().into_iter().map(|m| m.addr).collect();
        assert_eq!(addrs, ["/a", "/b", "/c", "/d"]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(decode(b"\xff\xfe\x00"), Err(CodecError::Decode(_))));
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn test_floats_helper() {
        assert_eq!(
            floats(&[1.0, -2.0]),
            vec![OscType::Float(1.0), OscType::Float(-2.0)]
        );
    }
}
