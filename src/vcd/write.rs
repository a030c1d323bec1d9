// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Serializes a [`Document`] back to VCD text. Parsing the output yields a
//! document equal to the one written.
use std::io;
use std::io::Write;

use super::signal::Value;
use super::types::{Document, Header, ScopeItem};

/// Writes `document` as VCD text to `writer`.
///
/// Comments found anywhere in the declarations are written together,
/// before the timescale.
pub fn write_vcd<W: Write>(document: &Document, writer: W) -> io::Result<()> {
    let mut writer = io::BufWriter::new(writer);
    let header = document.header();

    write_metadata(header, &mut writer)?;
    // the root itself has no `$scope` of its own
    for item in &header.root_scope().items {
        write_item(header, *item, &mut writer)?;
    }
    writeln!(writer, "$enddefinitions $end")?;

    let mut current_time = None;
    for change in document.value_changes() {
        if current_time != Some(change.timestamp) {
            writeln!(writer, "#{}", change.timestamp)?;
            current_time = Some(change.timestamp);
        }
        match &change.value {
            Value::Scalar(_) => writeln!(writer, "{}{}", change.value, change.identifier_code)?,
            _ => writeln!(writer, "{} {}", change.value, change.identifier_code)?,
        }
    }

    writer.flush()
}

fn write_metadata<W: Write>(header: &Header, writer: &mut W) -> io::Result<()> {
    let metadata = header.metadata();
    if let Some(date) = &metadata.date_text {
        writeln!(writer, "$date\n\t{date}\n$end")?;
    }
    if let Some(version) = &metadata.version {
        writeln!(writer, "$version\n\t{}\n$end", version.0)?;
    }
    for comment in &metadata.comments {
        writeln!(writer, "$comment\n\t{comment}\n$end")?;
    }
    if let Some(timescale) = header.timescale() {
        writeln!(writer, "$timescale {timescale} $end")?;
    }
    Ok(())
}

fn write_item<W: Write>(header: &Header, item: ScopeItem, writer: &mut W) -> io::Result<()> {
    match item {
        ScopeItem::Scope(idx) => {
            let scope = header.scope(idx);
            writeln!(writer, "$scope {} {} $end", scope.kind.keyword(), scope.name)?;
            for child in &scope.items {
                write_item(header, *child, writer)?;
            }
            writeln!(writer, "$upscope $end")
        }
        ScopeItem::Variable(idx) => {
            let var = header.variable(idx);
            write!(
                writer,
                "$var {} {} {} {}",
                var.var_type.keyword(),
                var.width,
                var.identifier_code,
                var.reference_name
            )?;
            if let Some(range) = var.bit_range {
                write!(writer, " {range}")?;
            }
            writeln!(writer, " $end")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::driver::parse_vcd;
    use super::*;

    #[test]
    fn writes_canonical_text() {
        let src = "$timescale 10 ps $end\n\
                   $scope module top $end\n\
                   $var wire 8 ! data[7:0] $end\n\
                   $var real 64 \" temp $end\n\
                   $upscope $end\n\
                   $var wire 1 # orphan $end\n\
                   $enddefinitions $end\n\
                   #0\nb101 !\nr2.5 \"\n1#\n#7\nz#\n";
        let document = parse_vcd(src.as_bytes()).unwrap();

        let mut out = vec![];
        write_vcd(&document, &mut out).unwrap();
        let expected = "$timescale 10ps $end\n\
                        $scope module top $end\n\
                        $var wire 8 ! data [7:0] $end\n\
                        $var real 64 \" temp $end\n\
                        $upscope $end\n\
                        $var wire 1 # orphan $end\n\
                        $enddefinitions $end\n\
                        #0\nb101 !\nr2.5 \"\n1#\n#7\nz#\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);

        let reparsed = parse_vcd(expected.as_bytes()).unwrap();
        assert_eq!(reparsed.header(), document.header());
    }

    #[test]
    fn metadata_survives() {
        let src = "$date Mon Jan 10 11:22:33 2022 $end\n\
                   $version Icarus Verilog $end\n\
                   $comment one $end\n\
                   $enddefinitions $end\n";
        let document = parse_vcd(src.as_bytes()).unwrap();

        let mut out = vec![];
        write_vcd(&document, &mut out).unwrap();
        let reparsed = parse_vcd(out.as_slice()).unwrap();
        assert_eq!(reparsed, document);
        assert!(reparsed.metadata().date.is_some());
    }
}
