//! Argument handling, error reporting and completion conventions of the
//! public decode entry points.

mod common;

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::time::Duration;

use qrsnap::{
    DecodeError, DecodeResult, Decoder, Dimension, ErrorKind, ImageArg, RasterImage, decode,
    decode_blocking, decode_with,
};

const TIMEOUT: Duration = Duration::from_secs(30);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run a decode through the callback convention and wait for its outcome
fn via_callback(image: impl Into<ImageArg>) -> Result<DecodeResult, DecodeError> {
    let (tx, rx) = mpsc::channel();
    decode_with(image, move |outcome| {
        let _ = tx.send(outcome);
    })?;
    rx.recv_timeout(TIMEOUT).expect("callback was not invoked")
}

#[test]
fn test_non_image_arguments_fail_synchronously() {
    init_tracing();
    for arg in [
        ImageArg::Null,
        ImageArg::Bool(false),
        ImageArg::Number(3.0),
        ImageArg::Text("Hello World".into()),
    ] {
        let kind = arg.kind();
        let err = decode(arg.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().ends_with(kind), "{err}");

        let err = decode_with(arg, |_| panic!("callback must not run")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

#[test]
fn test_descriptor_without_pixels_is_invalid() {
    let mut fields = BTreeMap::new();
    fields.insert("width".to_string(), ImageArg::Number(2.0));
    fields.insert("height".to_string(), ImageArg::Number(2.0));
    let err = decode(ImageArg::Object(fields)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("pixels"));
}

#[test]
fn test_unsupported_channel_counts() {
    for (len, expected) in [(2 * 6, 2.0), (5 * 6, 5.0), (6 * 6 + 3, 6.5)] {
        let raster = RasterImage::new(vec![0; len], 3, 2);
        let err = decode(raster).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedChannelCount(expected));
        assert_eq!(err.kind(), ErrorKind::UnsupportedChannelCount);
    }
}

#[test]
fn test_zero_dimensions() {
    let err = decode(RasterImage::new(vec![0; 4], 0, 4)).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::InvalidDimension {
            dimension: Dimension::Width,
            ..
        }
    ));

    let err = decode_blocking(RasterImage::new(vec![0; 4], 4, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDimension);
    assert_eq!(err.to_string(), "invalid height: 0");
}

#[test]
fn test_empty_buffer_fails_to_load() {
    init_tracing();
    let err = decode_blocking(Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineLoadFailure);
    assert_eq!(err.to_string(), "failed to load image");

    let err = via_callback(Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "failed to load image");
}

#[test]
fn test_text_bytes_fail_to_load() {
    let err = decode_blocking(&b"Hello World"[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineLoadFailure);
}

#[test]
fn test_images_without_symbols_are_empty() {
    let white = image::GrayImage::from_pixel(1, 1, image::Luma([255]));
    assert!(decode_blocking(common::png(&white)).unwrap().is_empty());
    assert!(decode_blocking(common::jpeg(&white)).unwrap().is_empty());
    assert!(
        decode_blocking(RasterImage::new(vec![255; 3], 1, 1))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_callback_and_deferred_agree() {
    init_tracing();
    let png = common::png(&common::hello_world());

    let pending = decode(png.clone()).unwrap();
    let deferred = smol::block_on(async { pending.await });
    let callback = via_callback(png.clone());
    let blocking = decode_blocking(png);

    assert_eq!(deferred, callback);
    assert_eq!(deferred, blocking);
    assert_eq!(deferred.map(|r| r.len()), Ok(2));

    let pending = decode(Vec::new()).unwrap();
    let deferred = smol::block_on(async { pending.await });
    assert_eq!(deferred, via_callback(Vec::new()));
}

#[test]
fn test_concurrent_decodes_all_settle() {
    let png = common::png(&common::hello_world());
    let decoder = Decoder::new();
    let pending: Vec<_> = (0..8).map(|_| decoder.decode(png.clone()).unwrap()).collect();
    for handle in pending {
        let result = handle.wait().unwrap();
        assert_eq!(result.len(), 2);
    }
}

#[test]
fn test_dropped_handle_does_not_block_other_calls() {
    let png = common::png(&common::hello_world());
    drop(decode(png.clone()).unwrap());
    assert_eq!(decode_blocking(png).map(|r| r.len()), Ok(2));
}
