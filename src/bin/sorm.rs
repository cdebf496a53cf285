use clap::{Parser, ValueEnum};
use ndarray::{Array1, Array2};
use rust_reliability::{
    differentiation::{AnalyticHessian, FiniteDifferenceHessian, FixedHessian, HessianSupplier},
    limit_state::{EllipticalG2, Point},
    mpp::{MppOptions, find_mpp, form_probability},
    saddlepoint::{
        CurvatureMode, SaddlepointOptions, SaddlepointReport, TailVariant, saddlepoint_probability,
    },
    simulation::monte_carlo_seeded,
};

#[derive(Parser, Debug)]
#[command(name = "sorm")]
#[command(
    about = "Saddlepoint SORM probability of failure for the elliptical benchmark surfaces",
    long_about = None
)]
struct Cli {
    /// Benchmark limit state.
    #[arg(long = "limit-state", value_enum, default_value_t = LimitStateArg::Reference)]
    limit_state: LimitStateArg,

    /// Most probable point, comma separated. Ignored with --find-mpp.
    #[arg(long = "u-star", value_delimiter = ',', allow_hyphen_values = true)]
    u_star: Option<Vec<f64>>,

    /// Locate the MPP first from the standard starting points.
    #[arg(long = "find-mpp", default_value_t = false)]
    find_mpp: bool,

    /// Hessian at U*, row-major and comma separated. Defaults to finite
    /// differences.
    #[arg(long = "hessian", value_delimiter = ',', allow_hyphen_values = true)]
    hessian: Option<Vec<f64>>,

    /// Use the closed-form Hessian of the benchmark surface.
    #[arg(long = "analytic-hessian", default_value_t = false, conflicts_with = "hessian")]
    analytic_hessian: bool,

    /// Finite-difference step.
    #[arg(long = "eps", default_value_t = 1e-6)]
    eps: f64,

    #[arg(long = "variant", value_enum, default_value_t = VariantArg::Magnitude)]
    variant: VariantArg,

    #[arg(long = "curvature", value_enum, default_value_t = CurvatureArg::Diagonal)]
    curvature: CurvatureArg,

    /// Monte Carlo sample count; 0 skips the simulation.
    #[arg(long = "mc-samples", default_value_t = 100_000)]
    mc_samples: usize,

    #[arg(long = "seed", default_value_t = 42)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LimitStateArg {
    Reference,
    Narrow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Magnitude,
    Curvature,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CurvatureArg {
    Diagonal,
    Eigen,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let g2 = match cli.limit_state {
        LimitStateArg::Reference => EllipticalG2::reference(),
        LimitStateArg::Narrow => EllipticalG2::narrow(),
    };

    let opts = SaddlepointOptions::new(
        cli.eps,
        match cli.curvature {
            CurvatureArg::Diagonal => CurvatureMode::Diagonal,
            CurvatureArg::Eigen => CurvatureMode::Eigen,
        },
        match cli.variant {
            VariantArg::Magnitude => TailVariant::Magnitude,
            VariantArg::Curvature => TailVariant::Curvature,
        },
        SaddlepointOptions::default().root_tol,
        SaddlepointOptions::default().scan,
    )
    .map_err(|e| e.to_string())?;

    let u_star = choose_u_star(&cli, &g2)?;

    let report = match (&cli.hessian, cli.analytic_hessian) {
        (Some(values), _) => {
            let supplier = FixedHessian(parse_hessian(values, u_star.len())?);
            run_pipeline(&g2, &u_star, &supplier, &opts)?
        }
        (None, true) => {
            let supplier = AnalyticHessian::new(|u: &Point| g2.analytic_hessian(u));
            run_pipeline(&g2, &u_star, &supplier, &opts)?
        }
        (None, false) => {
            let supplier = FiniteDifferenceHessian::new(cli.eps).map_err(|e| e.to_string())?;
            run_pipeline(&g2, &u_star, &supplier, &opts)?
        }
    };
    print_report(&report);

    let beta = u_star.dot(&u_star).sqrt();
    println!("FORM        beta = {beta:.6}, p_f = {:.6e}", form_probability(beta));

    if cli.mc_samples > 0 {
        let mc = monte_carlo_seeded(&g2, u_star.len(), cli.mc_samples, cli.seed)
            .map_err(|e| e.to_string())?;
        let (lo, hi) = mc.confidence_interval(1.96);
        println!(
            "Monte Carlo p_f = {:.6e} ± {:.2e} (95% CI [{lo:.6e}, {hi:.6e}], {} samples, seed {})",
            mc.p_f, mc.std_error, mc.n_samples, cli.seed
        );
    }
    Ok(())
}

fn choose_u_star(cli: &Cli, g2: &EllipticalG2) -> Result<Point, String> {
    match (&cli.u_star, cli.find_mpp) {
        (Some(values), false) => Ok(Array1::from(values.clone())),
        _ => {
            let guesses = [
                Array1::from(vec![3.0, 2.0]),
                Array1::from(vec![0.0, 0.0]),
                Array1::from(vec![2.0, 1.0]),
                Array1::from(vec![1.5, 1.5]),
            ];
            let outcome =
                find_mpp(g2, &guesses, &MppOptions::default()).map_err(|e| e.to_string())?;
            println!(
                "MPP         u* = {}, beta = {:.6} (start {}, {} outer / {} inner iterations)",
                outcome.u_star,
                outcome.beta,
                outcome.start_index,
                outcome.outer_iterations,
                outcome.inner_iterations
            );
            Ok(outcome.u_star)
        }
    }
}

fn parse_hessian(values: &[f64], dim: usize) -> Result<Array2<f64>, String> {
    Array2::from_shape_vec((dim, dim), values.to_vec()).map_err(|_| {
        format!("--hessian needs {} values for a {dim}x{dim} matrix, got {}", dim * dim, values.len())
    })
}

fn run_pipeline(
    g2: &EllipticalG2, u_star: &Point, supplier: &dyn HessianSupplier, opts: &SaddlepointOptions,
) -> Result<SaddlepointReport, String> {
    saddlepoint_probability(g2, u_star, supplier, opts)
        .map_err(|e| format!("{} failed: {e}", e.stage()))
}

fn print_report(report: &SaddlepointReport) {
    println!("u*          {}", report.u_star);
    println!("gradient    {}", report.gradient);
    println!("Hessian     ({})\n{}", report.hessian_source, report.hessian);
    println!("curvature   {}", report.curvature);
    println!("t_s         {:.10}", report.saddlepoint.t_s);
    println!("K'(t_s) - 1 {:.10}", report.saddlepoint.slope);
    println!("w           {:.10}", report.tail.w);
    println!("t           {:.10}", report.tail.t);
    println!("K(t_s)      {:.10}", report.tail.k_ts);
    println!("K''(t_s)    {:.10}", report.tail.k2_ts);
    println!(
        "Saddlepoint p_f = {:.6e}{}",
        report.p_f(),
        if report.tail.singular { " (w ≈ 0, Phi(w) used)" } else { "" }
    );
}
