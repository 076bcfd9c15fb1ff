//! Reply-buffer bounds: headroom-based truncation of later sub-commands and
//! the explicit overflow marker when a single reply no longer fits.

mod fixtures;

use cfg_shell::Interface;
use fixtures::*;

const MARK: &[u8] = b"ERR_BUFOVERFLOW\r\n";

#[test]
fn test_reply_fits_comfortably() {
    let mut e = engine();
    let mut buf = [0u8; 256];
    let n = dispatch_into(&mut e, "TEMP?\r\nTEMP?\r\n", &mut buf, Interface::Console);
    assert_eq!(&buf[..n], b"TEMP=21\r\nTEMP=21\r\n");
}

#[test]
fn test_later_subcommands_dropped_without_headroom() {
    let mut e = engine();
    let mut buf = [0u8; 30];
    let n = dispatch_into(
        &mut e,
        "TEMP?\r\nTEMP?\r\nTEMP?\r\n",
        &mut buf,
        Interface::Console,
    );
    // two replies fit within the headroom reserve, the third is dropped
    assert_eq!(&buf[..n], b"TEMP=21\r\nTEMP=21\r\n");
}

#[test]
fn test_truncation_produces_no_error_text() {
    let mut e = engine();
    let mut buf = [0u8; 30];
    let n = dispatch_into(
        &mut e,
        "TEMP?\r\nTEMP?\r\nTEMP?\r\n",
        &mut buf,
        Interface::Console,
    );
    let text = core::str::from_utf8(&buf[..n]).unwrap();
    assert!(!text.contains("ERR"));
    assert!(!text.contains("WRNG"));
}

#[test]
fn test_overflow_marker_on_oversized_reply() {
    let mut e = engine();
    // a 15-byte name makes the GET reply 22 bytes
    dispatch(&mut e, "NAME=abcdefghijklmno\r\n", Interface::Console);

    let mut buf = [0u8; 21];
    let n = dispatch_into(&mut e, "NAME?\r\n", &mut buf, Interface::Console);
    assert_eq!(n, 21);
    assert!(buf[..n].ends_with(MARK));
}

#[test]
fn test_overflow_stops_processing() {
    let mut e = engine();
    dispatch(&mut e, "NAME=abcdefghijklmno\r\n", Interface::Console);

    let mut buf = [0u8; 21];
    let n = dispatch_into(
        &mut e,
        "NAME?\r\nTEMP=99\r\n",
        &mut buf,
        Interface::Console,
    );
    assert!(buf[..n].ends_with(MARK));
    // the sub-command after the overflow never ran
    assert_eq!(
        dispatch(&mut e, "TEMP?\r\n", Interface::Console),
        "TEMP=21\r\n"
    );
}

#[test]
fn test_tiny_buffer_yields_empty_reply() {
    let mut e = engine();
    let mut buf = [0u8; 10];
    let n = dispatch_into(&mut e, "TEMP?\r\n", &mut buf, Interface::Console);
    assert_eq!(n, 0);
}

#[test]
fn test_reply_never_exceeds_buffer() {
    let mut e = engine();
    for size in [0usize, 1, 16, 17, 21, 32, 64] {
        let mut buf = vec![0u8; size];
        let n = dispatch_into(
            &mut e,
            "TEMP?\r\nNAME?\r\nBOGUS=1\r\n",
            &mut buf,
            Interface::Console,
        );
        assert!(n <= size, "reply of {} bytes for buffer of {}", n, size);
    }
}
