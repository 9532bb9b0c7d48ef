// src/io/kpoints.rs

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn invalid(line_no: usize, msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {}", line_no, msg))
}

/// Reads a k-point list: one `kx ky kz` triple per line.
///
/// Blank lines and `#` comments are skipped. Coordinates are taken as
/// Cartesian, in the reciprocal units of the lattice.
pub fn parse<P: AsRef<Path>>(path: P) -> io::Result<Vec<[f64; 3]>> {
    let file = File::open(path.as_ref())?;
    let kpoints = read(io::BufReader::new(file))?;
    log::info!("Read {} k-points from {}", kpoints.len(), path.as_ref().display());
    Ok(kpoints)
}

pub fn read<R: BufRead>(reader: R) -> io::Result<Vec<[f64; 3]>> {
    let mut kpoints = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(invalid(i + 1, "expected 3 coordinates"));
        }

        let mut k = [0.0; 3];
        for (slot, token) in k.iter_mut().zip(&parts) {
            *slot = token
                .parse::<f64>()
                .map_err(|_| invalid(i + 1, &format!("invalid coordinate '{}'", token)))?;
        }
        kpoints.push(k);
    }

    Ok(kpoints)
}

pub fn write<P: AsRef<Path>>(path: P, kpoints: &[[f64; 3]]) -> io::Result<()> {
    let mut file = io::BufWriter::new(File::create(path)?);
    writeln!(file, "# kx ky kz")?;
    for k in kpoints {
        writeln!(file, "{:.10} {:.10} {:.10}", k[0], k[1], k[2])?;
    }
    file.flush()
}
