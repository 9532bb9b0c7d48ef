// src/utils/report.rs

use crate::model::motif::species_counts;
use crate::physics::bands::{BandSolution, EnergyUnit};
use crate::physics::system::System;

// Motif rows printed before truncating
const MAX_ATOM_ROWS: usize = 20;

/// Plain-text overview of a constructed system.
pub fn system_summary(system: &System) -> String {
    let crystal = system.crystal();
    let layout = system.layout();

    let species_str: String = species_counts(&crystal.motif)
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(s, n)| format!("S{}x{}", s, n))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str(&format!("System: {}\n", system.name()));
    out.push_str(&format!("Dimension: {}D\n", crystal.ndim()));
    out.push_str(&format!("Species: {}\n", species_str));
    out.push_str(&format!("Basis dimension: {}\n", system.basisdim()));
    out.push_str(&format!("Filling: {} (Fermi band {})\n", system.filling(), system.fermi_level()));
    out.push_str(&format!("Unit cells in sum: {}\n", system.ncells()));
    out.push_str(&format!("Orthogonal basis: {}\n", if system.is_orthogonal() { "yes" } else { "no" }));
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<6} {:<8} {:<10} {:<10} {:<10} {:<8}\n",
        "Atom", "Species", "X", "Y", "Z", "Basis"
    ));
    out.push_str("--------------------------------------------------\n");

    for (i, atom) in crystal.motif.iter().take(MAX_ATOM_ROWS).enumerate() {
        let block = layout.atom_block(i);
        out.push_str(&format!(
            "{:<6} {:<8} {:<10.4} {:<10.4} {:<10.4} {}..{}\n",
            i, atom.species, atom.position[0], atom.position[1], atom.position[2], block.start, block.end
        ));
    }

    if crystal.motif.len() > MAX_ATOM_ROWS {
        out.push_str(&format!("... and {} more atoms.\n", crystal.motif.len() - MAX_ATOM_ROWS));
    }

    out
}

/// Band edges around the Fermi band over a set of k-points:
/// (valence maximum, conduction minimum, gap).
pub fn band_edges(solutions: &[BandSolution], fermi_level: usize) -> Option<(f64, f64, f64)> {
    let mut vbm = f64::NEG_INFINITY;
    let mut cbm = f64::INFINITY;
    for sol in solutions {
        vbm = vbm.max(*sol.energies.get(fermi_level)?);
        cbm = cbm.min(*sol.energies.get(fermi_level + 1)?);
    }
    if solutions.is_empty() {
        return None;
    }
    Some((vbm, cbm, cbm - vbm))
}

/// One-paragraph gap report for a band pass.
pub fn gap_summary(solutions: &[BandSolution], fermi_level: usize) -> String {
    let unit = match solutions.first().map(|s| s.unit) {
        Some(EnergyUnit::ElectronVolt) => "eV",
        _ => "native units",
    };

    match band_edges(solutions, fermi_level) {
        Some((vbm, cbm, gap)) => {
            let kind = if gap <= 0.0 { "metallic" } else { "insulating" };
            format!(
                "Valence max: {:.6} {u}\nConduction min: {:.6} {u}\nGap: {:.6} {u} ({})\n",
                vbm,
                cbm,
                gap,
                kind,
                u = unit
            )
        }
        None => "Gap: unavailable (no band above the Fermi level)\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::system::tests::chain_config;
    use nalgebra::{DMatrix, DVector};
    use num_complex::Complex64;

    fn solution(energies: Vec<f64>) -> BandSolution {
        let n = energies.len();
        BandSolution {
            k: [0.0; 3],
            energies: DVector::from_vec(energies),
            eigenvectors: DMatrix::<Complex64>::identity(n, n),
            unit: EnergyUnit::Native,
        }
    }

    #[test]
    fn test_system_summary() {
        let system = System::new(chain_config(1.0)).unwrap();
        let text = system_summary(&system);
        assert!(text.contains("System: chain"));
        assert!(text.contains("Dimension: 1D"));
        assert!(text.contains("Species: S0x1"));
        assert!(text.contains("Fermi band 0"));
        assert!(text.contains("Unit cells in sum: 3"));
        assert!(text.contains("0..2"));
    }

    #[test]
    fn test_band_edges() {
        let sols = vec![solution(vec![-2.0, 1.0]), solution(vec![-1.5, 0.5])];
        let (vbm, cbm, gap) = band_edges(&sols, 0).unwrap();
        assert!((vbm + 1.5).abs() < 1e-12);
        assert!((cbm - 0.5).abs() < 1e-12);
        assert!((gap - 2.0).abs() < 1e-12);

        assert!(band_edges(&sols, 1).is_none());
        assert!(band_edges(&[], 0).is_none());
    }

    #[test]
    fn test_gap_summary_units() {
        let mut sols = vec![solution(vec![-2.0, 1.0])];
        assert!(gap_summary(&sols, 0).contains("Gap: 3.000000 native units (insulating)"));

        sols[0].unit = EnergyUnit::ElectronVolt;
        assert!(gap_summary(&sols, 0).contains("Gap: 3.000000 eV (insulating)"));
    }

    #[test]
    fn test_gap_summary_metallic() {
        // Chain bands overlap across the zone
        let system = System::new(chain_config(1.0)).unwrap();
        let mesh = system.crystal().brillouin_zone_mesh(8);
        let sols = system.solve_bands_mesh(&mesh, false).unwrap();
        let text = gap_summary(&sols, system.fermi_level());
        assert!(text.contains("metallic"), "{}", text);
        assert!(text.contains("native units"));
        assert!(!text.contains("eV"));
    }
}
