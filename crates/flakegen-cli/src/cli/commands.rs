use std::io::Write;

use anyhow::Context;
use flakegen::{DecodedId, FlakeId, IdGenerator};

use super::config::{DecodeFormat, IdFormat};

fn write_json_line(out: &mut impl Write, decoded: DecodedId) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, &decoded)?;
    writeln!(out)?;
    Ok(())
}

/// Writes `count` freshly generated IDs to `out`, one per line.
pub fn generate<G>(
    generator: &G,
    count: u64,
    format: IdFormat,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    G: IdGenerator,
{
    tracing::debug!(count, ?format, "generating ids");
    for _ in 0..count {
        let id = generator.generate()?;
        match format {
            IdFormat::Decimal => writeln!(out, "{id}")?,
            IdFormat::Padded => writeln!(out, "{}", id.to_padded_string())?,
            IdFormat::Json => write_json_line(out, generator.decode(id))?,
        }
    }
    out.flush()?;
    Ok(())
}

/// Parses each decimal ID and writes its fields to `out`, one line per ID.
pub fn decode<G>(
    generator: &G,
    ids: &[String],
    format: DecodeFormat,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    G: IdGenerator,
{
    for raw in ids {
        let id: FlakeId = raw
            .parse()
            .with_context(|| format!("cannot decode `{raw}`"))?;
        let decoded = generator.decode(id);
        match format {
            DecodeFormat::Text => writeln!(
                out,
                "{} timestamp_millis={} datacenter_id={} machine_id={} sequence={}",
                decoded.id,
                decoded.timestamp_millis,
                decoded.datacenter_id,
                decoded.machine_id,
                decoded.sequence
            )?,
            DecodeFormat::Json => write_json_line(out, decoded)?,
        }
    }
    out.flush()?;
    Ok(())
}
