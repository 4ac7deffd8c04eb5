//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use yangkit_netconf::framing::{FrameDecoder, Framing, FramingError};

const MSG1: &[u8] = br#"<rpc-reply message-id="1"><ok/></rpc-reply>"#;
const MSG2: &[u8] = br#"<rpc-reply message-id="2"><ok/></rpc-reply>"#;

//
// Helper functions.
//

// Feeds the input in pieces of `step` bytes and collects every message.
fn decode_split(framing: Framing, input: &[u8], step: usize) -> Vec<Bytes> {
    let mut decoder = FrameDecoder::new(framing);
    let mut msgs = vec![];
    for piece in input.chunks(step) {
        decoder.extend(piece);
        while let Some(msg) = decoder.decode().unwrap() {
            msgs.push(msg);
        }
    }
    msgs
}

//
// Tests.
//

#[test]
fn test_encode_eom() {
    let bytes = Framing::EndOfMessage.encode(b"<hello/>");
    assert_eq!(&bytes[..], b"<hello/>]]>]]>");
}

#[test]
fn test_encode_chunked() {
    let bytes = Framing::Chunked.encode(b"<rpc/>");
    assert_eq!(&bytes[..], b"\n#6\n<rpc/>\n##\n");
}

#[test]
fn test_decode_split_reads() {
    for framing in [Framing::EndOfMessage, Framing::Chunked] {
        let mut input = framing.encode(MSG1).to_vec();
        input.extend_from_slice(&framing.encode(MSG2));

        for step in [1, 2, 3, 7, 16, input.len()] {
            let msgs = decode_split(framing, &input, step);
            assert_eq!(msgs, vec![MSG1, MSG2], "{} step {}", framing, step);
        }
    }
}

#[test]
fn test_decode_multiple_chunks() {
    let input = b"\n#4\n<rpc\n#17\n message-id=\"101\"\n#3\n/>\n\n##\n";
    let msgs = decode_split(Framing::Chunked, input, 5);
    assert_eq!(msgs, vec![&b"<rpc message-id=\"101\"/>\n"[..]]);
}

#[test]
fn test_decode_partial_frame_is_kept() {
    let mut decoder = FrameDecoder::new(Framing::Chunked);
    decoder.extend(b"\n#10\n<rpc-");
    assert_eq!(decoder.decode(), Ok(None));
    assert_eq!(decoder.buffer_mut().len(), 10);

    let mut decoder = FrameDecoder::new(Framing::EndOfMessage);
    decoder.extend(b"<hello/>]]>]");
    assert_eq!(decoder.decode(), Ok(None));
    decoder.extend(b"]>");
    assert_eq!(decoder.decode(), Ok(Some(Bytes::from_static(b"<hello/>"))));
}

#[test]
fn test_decode_framing_switch() {
    // The server hello is followed by the first chunked message.
    let mut decoder = FrameDecoder::new(Framing::EndOfMessage);
    decoder.extend(b"<hello/>]]>]]>\n#5\n<ok/>\n##\n");
    assert_eq!(decoder.decode(), Ok(Some(Bytes::from_static(b"<hello/>"))));
    decoder.set_framing(Framing::Chunked);
    assert_eq!(decoder.decode(), Ok(Some(Bytes::from_static(b"<ok/>"))));
    assert_eq!(decoder.decode(), Ok(None));
}

#[test]
fn test_decode_invalid_chunk_header() {
    let cases: [(&[u8], FramingError); 6] = [
        (b"<rpc/>", FramingError::InvalidChunkHeader),
        (b"\n!5\n", FramingError::InvalidChunkHeader),
        (b"\n#5x", FramingError::InvalidChunkHeader),
        (b"\n#05\n<ok/>", FramingError::InvalidChunkSize),
        (b"\n#0\n", FramingError::InvalidChunkSize),
        (b"\n##\n", FramingError::EmptyMessage),
    ];
    for (input, error) in cases {
        let mut decoder = FrameDecoder::new(Framing::Chunked);
        decoder.extend(input);
        assert_eq!(decoder.decode(), Err(error), "{:?}", input);
    }
}
