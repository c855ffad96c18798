//! The tracking pixel served to mail clients.
//!
//! The body is a fixed 43-byte GIF89a image: one pixel, two-entry palette,
//! palette index 0 marked transparent by the graphic control extension.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Canonical 1x1 transparent GIF returned for every pixel request.
pub const TRANSPARENT_GIF: [u8; 43] = [
    // Header "GIF89a"
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61,
    // Logical screen: 1x1, global color table of 2 entries
    0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
    // Global color table: white, black
    0xff, 0xff, 0xff, 0x00, 0x00, 0x00,
    // Graphic control extension: transparent index 0
    0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00,
    // Image descriptor: 1x1 at origin, no local table
    0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
    // LZW minimum code size 2, one 2-byte sub-block, terminator
    0x02, 0x02, 0x44, 0x01, 0x00,
    // Trailer
    0x3b,
];

/// Media type of [`TRANSPARENT_GIF`].
pub const CONTENT_TYPE: &str = "image/gif";

/// `Cache-Control` value that forces a refetch on every open.
pub const CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Methods advertised in the pixel preflight response.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers advertised in the pixel preflight response.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Query parameter carrying the tracking token.
pub const TOKEN_QUERY_PARAM: &str = "text";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
