//! Positional argument protocol of the external measurement tool.
//!
//! All numbers travel as decimal text; the order is fixed and the tool
//! reads them positionally, so these builders are the single place the
//! ordering lives.

use crate::workflow::config::{DemoParams, SweepParams};

/// Demo invocation: `exe fd f n vel dt snr1 snr2 type sigSize`.
pub fn demo_argv(executable: &str, params: &DemoParams) -> Vec<String> {
    vec![
        executable.to_string(),
        params.fd.to_string(),
        params.f.to_string(),
        params.n.to_string(),
        params.vel.to_string(),
        params.dt.to_string(),
        params.snr1.to_string(),
        params.snr2.to_string(),
        params.modulation.type_code().to_string(),
        params.sig_size.to_string(),
    ]
}

/// Sweep-point invocation: `exe fd f n vel snrStatic snrVariable nRuns
/// sigSize`. No dt/type slot; the tool sweeps all three modulation kinds
/// internally, `n_runs` trials each.
pub fn sweep_point_argv(executable: &str, params: &SweepParams, snr_variable: f64) -> Vec<String> {
    vec![
        executable.to_string(),
        params.fd.to_string(),
        params.f.to_string(),
        params.n.to_string(),
        params.vel.to_string(),
        params.snr_static.to_string(),
        snr_variable.to_string(),
        params.n_runs.to_string(),
        params.sig_size.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigmetcore::modulation::Modulation;

    #[test]
    fn demo_argv_is_positional_and_complete() {
        let params = DemoParams {
            modulation: Modulation::Pm,
            ..Default::default()
        };
        let argv = demo_argv("./data_processing", &params);
        assert_eq!(
            argv,
            vec![
                "./data_processing",
                "20",
                "10",
                "100",
                "10",
                "10",
                "10",
                "10",
                "1",
                "30",
            ]
        );
    }

    #[test]
    fn sweep_argv_omits_dt_and_type() {
        let params = SweepParams {
            snr_static: 7.5,
            n_runs: 50,
            ..Default::default()
        };
        let argv = sweep_point_argv("./data_processing", &params, 2.5);
        assert_eq!(argv.len(), 9);
        assert_eq!(argv[5], "7.5");
        assert_eq!(argv[6], "2.5");
        assert_eq!(argv[7], "50");
    }
}
