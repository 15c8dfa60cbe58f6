/// Width of a US Letter page in points. Rendered frames are assumed to span
/// this width, which anchors every pixel-space stamp measurement.
pub const REFERENCE_PAGE_WIDTH_PT: f32 = 612.0;

/// Height of a US Letter page in points, used when a document omits its MediaBox.
pub const REFERENCE_PAGE_HEIGHT_PT: f32 = 792.0;

/// Oversampling factor applied to every rasterized page, independent of display size.
pub const RENDER_SCALE: f32 = 1.5;

/// Smallest stamp font size (pixels) drawn on a preview frame.
pub const MIN_READABLE_FONT_PX: f32 = 10.0;

/// Preview font boost so the stamp stays readable on a downscaled page.
pub const LEGIBILITY_MULTIPLIER: f32 = 1.2;

/// Outline stroke width as a fraction of the scaled font size.
pub const OUTLINE_WIDTH_FRACTION: f32 = 0.12;

/// Minimum outline stroke width in pixels.
pub const MIN_OUTLINE_WIDTH_PX: f32 = 1.0;

/// Light outline drawn under every stamp.
pub const OUTLINE_RGB: [u8; 3] = [255, 255, 255];

/// Default label prefix submitted to the stamping service.
pub const DEFAULT_PREFIX: &str = "J.DOE";

/// Default first Bates number.
pub const DEFAULT_START_NUMBER: u64 = 1;

/// Default zero-padding width.
pub const DEFAULT_DIGIT_WIDTH: usize = 8;

/// Accepted zero-padding widths.
pub const MIN_DIGIT_WIDTH: usize = 1;
pub const MAX_DIGIT_WIDTH: usize = 20;

/// Default stamp font size in points.
pub const DEFAULT_FONT_SIZE_PT: f32 = 12.0;

/// Accepted stamp font sizes in points.
pub const MIN_FONT_SIZE_PT: f32 = 4.0;
pub const MAX_FONT_SIZE_PT: f32 = 72.0;

/// Default distance between the stamp and the page edges, in points.
pub const DEFAULT_ZONE_PADDING_PT: f32 = 18.0;

/// Accepted zone padding, in points.
pub const MIN_ZONE_PADDING_PT: f32 = 6.0;
pub const MAX_ZONE_PADDING_PT: f32 = 144.0;

/// Default stamp color (pure blue), matching the stamping service.
pub const DEFAULT_COLOR_RGB: [u8; 3] = [0, 0, 255];

/// Number of rendered base frames kept per session.
pub const DEFAULT_FRAME_CACHE_CAPACITY: usize = 24;

/// Document extensions the preview can rasterize.
pub const SUPPORTED_DOCUMENT_EXTENSIONS: [&str; 1] = ["pdf"];

/// Raster image extensions the preview can decode.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Extension of bundles expanded by intake.
pub const BUNDLE_EXTENSION: &str = "zip";

/// Display format of the index "Date Produced" column.
pub const INDEX_DATE_FORMAT: &str = "%m/%d/%Y";

/// Default index party (selects the category fill on the generated sheet).
pub const DEFAULT_INDEX_PARTY: &str = "Client";

/// Default index title line.
pub const DEFAULT_INDEX_TITLE: &str = "CLIENT NAME - DOCUMENTS";

/// Largest rendered frame edge, in pixels.
pub const MAX_FRAME_DIMENSION_PX: u32 = 16_384;

/// Largest decompressed archive member accepted by intake.
pub const MAX_ARCHIVE_ENTRY_BYTES: u64 = 512 * 1024 * 1024;

/// Upper bound on the buffer reserved from an entry's declared size.
pub const MAX_ENTRY_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;
