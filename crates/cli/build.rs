use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("docx2mdx")
        .version(env!("CARGO_PKG_VERSION"))
        .author("docx2mdx Contributors")
        .about("Convert Word documents to MDX")
        .arg(
            clap::arg!(<INPUT> "A .docx file, or a directory with --directory")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-o --output <PATH> "Output file, or output directory with --directory")
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-d --directory "Convert every .docx file in INPUT"))
        .arg(clap::arg!(--description <TEXT> "Front-matter description").value_name("TEXT"))
        .arg(clap::arg!(--author <NAME> "Front-matter author").value_name("NAME"))
        .arg(clap::arg!(--json "Print the result as JSON on stdout"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "docx2mdx", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "docx2mdx", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "docx2mdx", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "docx2mdx", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
