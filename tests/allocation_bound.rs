//! Allocation behavior of the adapters, observed through a tracking global
//! allocator: oversized headers are rejected before the raster buffer
//! exists, and the delegate adapters allocate at most one image-sized
//! buffer per load.

mod common;

use std::alloc::{GlobalAlloc, Layout, System};
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rasterload::ErrorKind;

struct Tracking;

static LARGEST: AtomicUsize = AtomicUsize::new(0);
/// Requests of at least `THRESHOLD` bytes are counted in `LARGE`.
static THRESHOLD: AtomicUsize = AtomicUsize::new(usize::MAX);
static LARGE: AtomicUsize = AtomicUsize::new(0);
/// The counters are process-wide; tests take turns.
static SERIAL: Mutex<()> = Mutex::new(());

fn record(size: usize) {
    LARGEST.fetch_max(size, Ordering::Relaxed);
    if size >= THRESHOLD.load(Ordering::Relaxed) {
        LARGE.fetch_add(1, Ordering::Relaxed);
    }
}

/// Number of allocations of at least `threshold` bytes made by `f`.
fn count_large<T>(threshold: usize, f: impl FnOnce() -> T) -> (T, usize) {
    LARGE.store(0, Ordering::SeqCst);
    THRESHOLD.store(threshold, Ordering::SeqCst);
    let out = f();
    THRESHOLD.store(usize::MAX, Ordering::SeqCst);
    (out, LARGE.load(Ordering::SeqCst))
}

unsafe impl GlobalAlloc for Tracking {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record(layout.size());
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        record(layout.size());
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record(new_size);
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: Tracking = Tracking;

const ONE_MIB: usize = 1 << 20;

#[test]
fn oversized_width_rejected_without_large_allocation() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    // 5000 x 4000 x 3 = 60 MB if it were ever allocated
    let hostile = common::bmp_with_raster(5000, 4000, 60_000_000, &[0; 64]);
    // 1024 x 1024 x 3 = 3 MiB, proves the tracker sees raster buffers
    let honest = common::bmp_with_raster(1024, 1024, 1024 * 1024 * 3, &vec![0; 1024 * 1024 * 3]);

    LARGEST.store(0, Ordering::SeqCst);
    let err = rasterload::load_from_reader(Cursor::new(hostile)).unwrap_err();
    let largest_rejected = LARGEST.load(Ordering::SeqCst);
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert!(
        largest_rejected < ONE_MIB,
        "rejecting the header allocated {largest_rejected} bytes"
    );

    LARGEST.store(0, Ordering::SeqCst);
    let img = rasterload::load_from_reader(Cursor::new(honest)).unwrap();
    assert_eq!(img.size(), 1024 * 1024 * 3);
    assert!(LARGEST.load(Ordering::SeqCst) >= 1024 * 1024 * 3);
}

#[cfg(all(feature = "png", feature = "jpeg"))]
#[test]
fn delegate_adapters_allocate_one_image_buffer() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let (w, h) = (512u32, 512u32);
    let image_size = (w * h * 3) as usize;
    let source = common::pattern_rgb(w, h);
    let inputs = [
        common::png_bytes(w, h, png::ColorType::Rgb, &source),
        common::jpeg_bytes(w, h, image::ExtendedColorType::Rgb8, &source),
    ];

    for bytes in inputs {
        let reader = Cursor::new(bytes);
        let (img, large) = count_large(image_size, || {
            rasterload::load_from_reader(reader).unwrap()
        });
        assert_eq!(img.size(), image_size);
        assert_eq!(large, 1, "{large} image-sized allocations");
    }
}
