// Mean Earth radius.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// Default propagation speed for expected-RTT computations, in km/ms.
pub const DEFAULT_SPEED_KM_MS: f64 = 300.0;

// A round trip covers the pair distance twice.
pub const RTT_FACTOR: f64 = 2.0;

// Decimal places kept on RTT inflation ratios.
pub const INFLATION_DECIMALS: i32 = 4;

// Placeholder values stored for cells the report leaves blank.
pub const NO_DELAY_MS: i64 = 0;
pub const NO_LOSS_PCT: f64 = -1.0;

// Structural patterns for the measurement table markup. The pages put the
// row tags and each data cell on separate lines; all patterns apply to a
// single trimmed line.
pub const TABLE_OPEN_PAT: &str = r"(?i)^<\s*table.*?>";
pub const TABLE_CLOSE_PAT: &str = r"(?i)^<\s*/\s*table.*?>";
pub const ROW_OPEN_PAT: &str = r"^<TR>";
pub const ROW_CLOSE_PAT: &str = r"</TR>";
pub const CELL_PAT: &str = r"^<TD .*?>(?:<FONT.*?>(.*?)</FONT>|(&nbsp;))</TD>";
pub const GRID_START_PAT: &str = r"^<TD.*?>.*?CITY\s+PAIRS.*?</TD>";

// Token the pages use for an explicit blank cell.
pub const BLANK_CELL: &str = "&nbsp;";
