use super::*;

#[test]
fn handshake_layout_is_byte_exact() {
    let h = handshake(773_094_113_280);
    assert_eq!(h.len(), 152);
    assert_eq!(&h[0..8], b"NBDMAGIC");
    assert_eq!(&h[8..16], &[0x00, 0x00, 0x42, 0x02, 0x81, 0x86, 0x12, 0x53]);
    assert_eq!(&h[16..24], &773_094_113_280u64.to_be_bytes());
    assert!(h[24..].iter().all(|&b| b == 0), "flags and reserved are zero");
}

#[test]
fn request_decodes_big_endian_fields() {
    let mut raw = [0u8; REQUEST_LEN];
    raw[0..4].copy_from_slice(&[0x25, 0x60, 0x95, 0x13]);
    raw[4..8].copy_from_slice(&[0, 0, 0, 0]);
    raw[8..16].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    raw[16..24].copy_from_slice(&[0, 0, 0, 0, 0, 1, 0, 0]);
    raw[24..28].copy_from_slice(&[0, 0, 0x10, 0]);

    let req = Request::decode(&raw);
    assert!(req.has_valid_magic());
    assert_eq!(req.command, Command::Read);
    assert_eq!(req.handle, [1, 2, 3, 4, 5, 6, 7, 8], "handle is not byte swapped");
    assert_eq!(req.offset, 0x1_0000);
    assert_eq!(req.length, 4096);
    assert_eq!(req.encode(), raw);
}

#[test]
fn request_with_wrong_magic_still_decodes() {
    let req = Request {
        magic: 0xDEAD_BEEF,
        command: Command::Read,
        handle: [0; 8],
        offset: 0,
        length: 0,
    };
    let back = Request::decode(&req.encode());
    assert_eq!(back.magic, 0xDEAD_BEEF);
    assert!(!back.has_valid_magic());
}

#[test]
fn command_codes_map_both_ways() {
    let known = [
        (0, Command::Read),
        (1, Command::Write),
        (2, Command::Disconnect),
        (3, Command::Flush),
        (4, Command::Trim),
    ];
    for (code, cmd) in known {
        assert_eq!(Command::from(code), cmd);
        assert_eq!(u32::from(cmd), code);
    }
    assert_eq!(Command::from(77), Command::Unknown(77));
    assert_eq!(u32::from(Command::Unknown(77)), 77);
}

#[test]
fn reply_encodes_magic_status_and_handle() {
    let r = Reply::error(STATUS_EPERM, *b"handle!!");
    let raw = r.encode();
    assert_eq!(&raw[0..4], &[0x67, 0x44, 0x66, 0x98]);
    assert_eq!(&raw[4..8], &1u32.to_be_bytes());
    assert_eq!(&raw[8..16], b"handle!!");
    assert_eq!(Reply::decode(&raw), Some(r));
}

#[test]
fn reply_decode_rejects_bad_magic() {
    let mut raw = Reply::ok([9; 8]).encode();
    raw[0] ^= 0xFF;
    assert_eq!(Reply::decode(&raw), None);
}

#[test]
fn status_codes_follow_errno() {
    assert_eq!(STATUS_OK, 0);
    assert_eq!(STATUS_EPERM, 1);
    assert_eq!(STATUS_EINVAL, 22);
}
