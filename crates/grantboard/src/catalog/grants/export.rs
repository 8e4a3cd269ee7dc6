use std::io::Write;

use super::listing::GrantDisplay;

/// Writes the listing rows in arrival order with a header row.
pub fn write_listing_csv<W: Write>(writer: W, rows: &[GrantDisplay]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
