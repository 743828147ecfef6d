use console::Style;
use panorama_core::pipeline::config::PanoramaConfig;
use panorama_core::pipeline::Panorama;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warning: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            warning: Style::new().yellow().bold(),
        }
    }
}

pub fn print_stitch_summary(config: &PanoramaConfig) {
    let s = Styles::new();
    let st = &config.stitching;

    println!();
    println!("  {}", s.title.apply_to("Panorama Stitching"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!("  {}", s.header.apply_to("Inputs"));
    for (i, path) in config.inputs.iter().enumerate() {
        println!(
            "    {:<4}{}",
            s.label.apply_to(i + 1),
            s.path.apply_to(path.display())
        );
    }
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    match config.diagnostic {
        Some(ref path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Matches"),
            s.path.apply_to(path.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Matches"),
            s.disabled.apply_to("not saved")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Stitching"));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Order"),
        s.method.apply_to(st.order)
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Min matches"),
        s.value.apply_to(st.min_match_count)
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Reprojection"),
        s.value.apply_to(format!("{} px", st.reprojection_threshold))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Feather"),
        s.value.apply_to(format!("{:.0}%", st.smoothing_window_percent * 100.0))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Max keypoints"),
        s.value.apply_to(st.features.max_keypoints)
    );
    match st.ransac.seed {
        Some(seed) => println!(
            "    {:<16}{}",
            s.label.apply_to("RANSAC seed"),
            s.value.apply_to(format!("{seed:#x}"))
        ),
        None => println!(
            "    {:<16}{}",
            s.label.apply_to("RANSAC seed"),
            s.disabled.apply_to("random")
        ),
    }
    println!();
}

pub fn print_result_summary(panorama: &Panorama, config: &PanoramaConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Steps"));
    for step in &panorama.steps {
        println!(
            "    {:<4}{} + {} px  {}  {} matches, {} inliers, feather {:.0} px",
            s.label.apply_to(step.step),
            step.query_width,
            step.train_width,
            s.value.apply_to(format!(
                "-> {}x{}",
                step.composite_size.1, step.composite_size.0
            )),
            step.pair.matches,
            step.pair.inliers,
            step.pair.feather_width
        );
    }
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Panorama"),
        s.value.apply_to(format!(
            "{}x{}",
            panorama.image.width(),
            panorama.image.height()
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Saved to"),
        s.path.apply_to(config.output.display())
    );
    if let (Some(path), Some(_)) = (&config.diagnostic, &panorama.diagnostic) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Matches"),
            s.path.apply_to(path.display())
        );
    }
    println!();
}

pub fn print_warning(message: &str) {
    let s = Styles::new();
    println!("  {} {}", s.warning.apply_to("warning:"), message);
}
