use image::{Rgb, RgbImage};
use vqmatch::lowlevel::extract_window_with_context;
use vqmatch::{prepare_reference, MemoryFrames, ReferenceConfig, VisualCrop, VqError};

fn make_gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 2) as u8, (y * 2) as u8, ((x + y) & 0xFF) as u8])
    })
}

fn crop_at(frame_number: usize, width: u32, height: u32, bbox: (u32, u32, u32, u32)) -> VisualCrop {
    VisualCrop {
        frame_number,
        original_width: width,
        original_height: height,
        x: bbox.0,
        y: bbox.1,
        width: bbox.2,
        height: bbox.3,
    }
}

#[test]
fn reference_has_configured_square_size() {
    let mut source = MemoryFrames::new(vec![make_gradient(120, 90); 3]);
    let crop = crop_at(1, 120, 90, (30, 20, 40, 25));

    let reference = prepare_reference(&mut source, &crop, &ReferenceConfig::default()).unwrap();
    assert_eq!(reference.size(), 256);
    assert_eq!(reference.image().dimensions(), (256, 256));
}

#[test]
fn context_is_clipped_to_frame() {
    let frame = make_gradient(100, 100);
    let window = extract_window_with_context(&frame, (10, 10, 20, 20), 5, 20, 125).unwrap();
    // (5, 5)..(25, 25) is square already and exactly 20 px, so no resampling.
    assert_eq!(window.dimensions(), (20, 20));
    assert_eq!(window.get_pixel(0, 0), frame.get_pixel(5, 5));
    assert_eq!(window.get_pixel(19, 19), frame.get_pixel(24, 24));

    let corner = extract_window_with_context(&frame, (2, 3, 12, 13), 5, 15, 125).unwrap();
    // Expanded to (-3, -2)..(17, 18), clipped to (0, 0)..(17, 18): 17x18 padded to 18x18.
    assert_eq!(corner.dimensions(), (15, 15));
}

#[test]
fn wide_windows_are_padded_top_and_bottom() {
    let frame = RgbImage::from_pixel(60, 40, Rgb([200, 200, 200]));
    let window = extract_window_with_context(&frame, (0, 0, 60, 40), 0, 60, 125).unwrap();

    assert_eq!(window.dimensions(), (60, 60));
    assert_eq!(*window.get_pixel(30, 0), Rgb([125, 125, 125]));
    assert_eq!(*window.get_pixel(30, 9), Rgb([125, 125, 125]));
    assert_eq!(*window.get_pixel(30, 10), Rgb([200, 200, 200]));
    assert_eq!(*window.get_pixel(30, 49), Rgb([200, 200, 200]));
    assert_eq!(*window.get_pixel(30, 50), Rgb([125, 125, 125]));
}

#[test]
fn tall_windows_put_the_odd_pad_column_on_the_right() {
    let frame = RgbImage::from_pixel(7, 10, Rgb([10, 20, 30]));
    let window = extract_window_with_context(&frame, (0, 0, 7, 10), 0, 10, 0).unwrap();

    // 3 columns of padding: 1 left, 2 right.
    assert_eq!(*window.get_pixel(0, 5), Rgb([0, 0, 0]));
    assert_eq!(*window.get_pixel(1, 5), Rgb([10, 20, 30]));
    assert_eq!(*window.get_pixel(7, 5), Rgb([10, 20, 30]));
    assert_eq!(*window.get_pixel(8, 5), Rgb([0, 0, 0]));
    assert_eq!(*window.get_pixel(9, 5), Rgb([0, 0, 0]));
}

#[test]
fn stale_frame_dimensions_are_corrected() {
    let color = Rgb([40, 90, 160]);
    let crop = crop_at(0, 100, 80, (20, 20, 30, 30));
    let cfg = ReferenceConfig {
        context_pad: 4,
        size: 32,
        pad_value: 125,
    };

    let mut stale = MemoryFrames::new(vec![RgbImage::from_pixel(50, 40, color)]);
    let mut exact = MemoryFrames::new(vec![RgbImage::from_pixel(100, 80, color)]);
    let from_stale = prepare_reference(&mut stale, &crop, &cfg).unwrap();
    let from_exact = prepare_reference(&mut exact, &crop, &cfg).unwrap();
    assert_eq!(from_stale, from_exact);
}

#[test]
fn preparation_is_deterministic() {
    let mut source = MemoryFrames::new(vec![make_gradient(90, 70)]);
    let crop = crop_at(0, 90, 70, (11, 7, 33, 21));
    let cfg = ReferenceConfig::default();

    let first = prepare_reference(&mut source, &crop, &cfg).unwrap();
    let second = prepare_reference(&mut source, &crop, &cfg).unwrap();
    assert_eq!(first, second);
}

#[test]
fn boxes_outside_the_frame_are_degenerate() {
    let mut source = MemoryFrames::new(vec![make_gradient(100, 100)]);
    let crop = crop_at(0, 100, 100, (150, 10, 10, 10));
    let cfg = ReferenceConfig {
        context_pad: 0,
        ..ReferenceConfig::default()
    };

    let err = prepare_reference(&mut source, &crop, &cfg).unwrap_err();
    assert_eq!(
        err,
        VqError::DegenerateBox {
            x1: 150,
            y1: 10,
            x2: 100,
            y2: 20,
        }
    );
}

#[test]
fn empty_crops_are_rejected() {
    let mut source = MemoryFrames::new(vec![make_gradient(100, 100)]);
    let crop = crop_at(0, 100, 100, (10, 10, 0, 5));
    let err = prepare_reference(&mut source, &crop, &ReferenceConfig::default()).unwrap_err();
    assert!(matches!(err, VqError::DegenerateBox { .. }));
}

#[test]
fn missing_crop_frame_is_reported() {
    let mut source = MemoryFrames::new(vec![make_gradient(40, 40)]);
    let crop = crop_at(3, 40, 40, (5, 5, 10, 10));
    let err = prepare_reference(&mut source, &crop, &ReferenceConfig::default()).unwrap_err();
    assert_eq!(err, VqError::FrameOutOfRange { index: 3, len: 1 });
}
