//! LaTeX rendering of component equations for documentation output.

use crate::combustion::{COMBUSTION_PRESSURE, ENERGY_BALANCE, MASS_FLOW, STOICHIOMETRY};
use crate::traits::EquationBlock;

/// One equation block written out for a report.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationReport {
    pub block: &'static str,
    pub label: String,
    pub latex: String,
}

fn latex(kind: &str, block: &str) -> Option<&'static str> {
    let eq = match block {
        MASS_FLOW => r"0 = \dot{m}_\mathrm{in,1} + \dot{m}_\mathrm{in,2} - \dot{m}_\mathrm{out,1}",
        COMBUSTION_PRESSURE => {
            r"\begin{split}0 &= p_\mathrm{in,1} - p_\mathrm{out,1}\\0 &= p_\mathrm{in,2} - p_\mathrm{out,1}\end{split}"
        }
        STOICHIOMETRY => {
            r"0 = \sum_i \dot{m}_{\mathrm{in},i} x_{j,\mathrm{in},i} + \varphi\,M_j \sum_f \dot{n}_f \nu_{j,f} - \dot{m}_\mathrm{out,1} x_{j,\mathrm{out,1}} \quad \forall j"
        }
        ENERGY_BALANCE => {
            r"0 = \sum_i \dot{m}_{\mathrm{in},i} \left(h_{\mathrm{in},i} - h_{\mathrm{in},i,\mathrm{ref}}\right) - \dot{m}_\mathrm{out,1} \left(h_\mathrm{out,1} - h_\mathrm{out,1,ref}\right) + \dot{Q}_\mathrm{ti}"
        }
        "lamb" => r"0 = \dot{n}_{\mathrm{O_2},\mathrm{in}} - \lambda\,\dot{n}_{\mathrm{O_2},\mathrm{stoich}}",
        "ti" => r"0 = \dot{Q}_\mathrm{ti} - \sum_f \mathrm{LHV}_f \left(\sum_i \dot{m}_{\mathrm{in},i} x_{f,\mathrm{in},i} - \dot{m}_\mathrm{out,1} x_{f,\mathrm{out,1}}\right)",
        "pr" => r"0 = p_\mathrm{in,1} \cdot pr - p_\mathrm{out,1}",
        "eta" if kind.starts_with("diabatic") => {
            r"0 = \sum_i \dot{m}_{\mathrm{in},i} \left(h_{\mathrm{in},i} - h_{\mathrm{in},i,\mathrm{ref}}\right) - \dot{m}_\mathrm{out,1} \left(h_\mathrm{out,1} - h_\mathrm{out,1,ref}\right) + \dot{Q}_\mathrm{ti} \cdot \eta"
        }
        _ => return None,
    };
    Some(eq)
}

/// Render `block` of a component of type `kind`, or `None` for blocks
/// without a written form.
pub fn describe(kind: &str, label: &str, block: &EquationBlock) -> Option<EquationReport> {
    latex(kind, block.name).map(|latex| EquationReport {
        block: block.name,
        label: format!("{label}: {}", block.name.replace('_', " ")),
        latex: latex.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combustion::CombustionChamber;
    use crate::diabatic::DiabaticCombustionChamber;
    use crate::test_support::network_species;
    use crate::traits::Component;
    use crate::variable::VariableKind;

    #[test]
    fn every_active_block_is_described() {
        let mut cc = DiabaticCombustionChamber::new("cc", &network_species()).unwrap();
        cc.set_fixed(VariableKind::Lamb, 2.0).unwrap();
        cc.set_fixed(VariableKind::Ti, 5.0e5).unwrap();
        cc.set_fixed(VariableKind::Pr, 0.95).unwrap();
        cc.set_fixed(VariableKind::Eta, 1.0).unwrap();
        let reports = cc.describe_equations();
        assert_eq!(reports.len(), cc.equation_blocks().len());
        let eta = reports.iter().find(|r| r.block == "eta").unwrap();
        assert!(eta.latex.contains(r"\eta"));
        assert_eq!(reports[1].label, "cc: stoichiometry");
    }

    #[test]
    fn adiabatic_chamber_has_no_efficiency_equation() {
        let cc = CombustionChamber::new("cc", &network_species()).unwrap();
        let block = EquationBlock {
            name: "eta",
            num_eq: 1,
            constant_deriv: false,
        };
        assert!(describe(cc.kind(), cc.label(), &block).is_none());
        assert_eq!(cc.describe_equations().len(), 4);
    }
}
