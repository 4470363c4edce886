//! The end-to-end demo sequence run by `roster demo`.

use crate::{directory::EmployeeDirectory, error::Result, sample::sample_records};
use roster_log::info;
use serde::Serialize;
use std::io::Write;

/// Default name of the collection indexed without `Department`.
pub const NAME_COLLECTION: &str = "employees-name";

/// Default name of the collection indexed without `Gender`.
pub const PHONE_COLLECTION: &str = "employees-phone";

/// Reset both collections, load the sample set, delete one employee, then
/// print counts, searches and department facets to `out`.
///
/// The first failing step aborts the sequence.
pub async fn run<W: Write>(
    directory: &EmployeeDirectory,
    name_collection: &str,
    phone_collection: &str,
    out: &mut W,
) -> Result<()> {
    info!("Running demo on {} and {}", name_collection, phone_collection);

    directory.reset_collection(name_collection).await?;
    directory.reset_collection(phone_collection).await?;
    writeln!(out, "Collections {} and {} reset", name_collection, phone_collection)?;

    let initial = directory.count(name_collection).await?;
    section(out, &format!("Count of {} before indexing", name_collection), &initial)?;

    let report = directory
        .index_records(name_collection, Some("Department"), sample_records())
        .await?;
    section(out, &format!("Indexed into {}", name_collection), &report)?;

    let report = directory
        .index_records(phone_collection, Some("Gender"), sample_records())
        .await?;
    section(out, &format!("Indexed into {}", phone_collection), &report)?;

    let deleted = directory.delete_by_identifier(name_collection, "E02003").await?;
    section(out, &format!("Deleted E02003 from {}", name_collection), &deleted)?;

    let remaining = directory.count(name_collection).await?;
    section(out, &format!("Count of {} after deletion", name_collection), &remaining)?;

    let searches = [
        (name_collection, "Department", "IT"),
        (name_collection, "Gender", "Male"),
        (phone_collection, "Department", "IT"),
    ];
    for (collection, field, value) in searches {
        let hits = directory.search_by_field(collection, field, value).await?;
        section(out, &format!("Search {} for {}={}", collection, field, value), &hits)?;
    }

    for collection in [name_collection, phone_collection] {
        let facet = directory.department_facet(collection).await?;
        section(out, &format!("Department facet of {}", collection), &facet)?;
    }

    Ok(())
}

fn section<W: Write, T: Serialize + ?Sized>(out: &mut W, label: &str, value: &T) -> Result<()> {
    writeln!(out, "\n== {}", label)?;
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_format() {
        let mut out = Vec::new();
        section(&mut out, "Count", &3u64).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\n== Count\n3\n");
    }
}
