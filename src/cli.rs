//! 命令行参数模块
//!
//! 该模块负责解析命令行参数。除了本工具自己识别的选项之外，所有
//! 剩余参数（包名与 pip 选项）都会原样透传给 `pip wheel`。

use clap::Parser;

/// Generate and upload wheels to an Amazon S3 wheelhouse.
#[derive(Debug, Parser)]
#[command(
    name = "wheelhouse",
    about = "Generate and upload wheels to an Amazon S3 wheelhouse",
    after_help = "Consult `pip wheel` for valid pip options."
)]
pub struct Args {
    /// Wheels to exclude from upload (glob pattern, repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "WHEEL_FILENAME")]
    pub exclude: Vec<String>,

    /// Canned ACL policy to apply to uploaded objects
    #[arg(short = 'a', long = "acl", value_name = "POLICY", default_value = "private")]
    pub acl: String,

    /// The Amazon S3 bucket to upload wheels to, as [s3://]name[/prefix]
    pub bucket: String,

    /// Packages and options forwarded verbatim to `pip wheel`
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "PACKAGE|PIP-OPTION"
    )]
    pub pip_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 只给桶名时使用默认值。
    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["wheelhouse", "my-bucket"]).unwrap();
        assert_eq!(args.bucket, "my-bucket");
        assert_eq!(args.acl, "private");
        assert!(args.exclude.is_empty());
        assert!(args.pip_args.is_empty());
    }

    /// `--exclude` 可以重复，值按出现顺序收集。
    #[test]
    fn test_repeatable_exclude() {
        let args = Args::try_parse_from([
            "wheelhouse",
            "-e",
            "six-*.whl",
            "--exclude",
            "numpy-*.whl",
            "my-bucket/wheels",
        ])
        .unwrap();
        assert_eq!(args.exclude, vec!["six-*.whl", "numpy-*.whl"]);
        assert_eq!(args.bucket, "my-bucket/wheels");
    }

    /// 桶名之后的所有参数都透传给 pip，包括带连字符的选项。
    #[test]
    fn test_pip_args_pass_through() {
        let args = Args::try_parse_from([
            "wheelhouse",
            "-a",
            "public-read",
            "my-bucket",
            "requests",
            "--no-deps",
            "--pre",
        ])
        .unwrap();
        assert_eq!(args.acl, "public-read");
        assert_eq!(args.pip_args, vec!["requests", "--no-deps", "--pre"]);
    }
}
