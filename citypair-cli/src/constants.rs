pub const DEFAULT_CITY_FILE: &str = "data/city-code-abbrev-name.txt";

// Field separator of the city table and the delimited grid output.
pub const FIELD_SEP: char = ',';

// Separators of the coordinate table: CODE<TAB>lat:lon[,lat:lon...].
pub const LOC_SEP: char = '\t';
pub const COORD_SEP: char = ':';
