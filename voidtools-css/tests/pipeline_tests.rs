use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use voidtools_css::tailwind::{covered_properties, fix_figma_css};
use voidtools_css::{
    convert_css, run_pipeline, ConversionSession, ConvertError, FnConverter, PipelineConfig,
    RuleConverter, Status,
};

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    path
}

fn read_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

// Fixtures
#[tokio::test]
async fn test_figma_card_fixture() {
    let result = convert_css(&read_fixture("figma-card.css")).await;
    assert_eq!(result.status, Status::Done);

    let classes: Vec<&str> = result.output.split_whitespace().collect();
    for expected in [
        "absolute",
        "w-80",
        "left-6",
        "top-0",
        "bg-white",
        "border",
        "border-solid",
        "rounded-lg",
        "font-['Inter']",
        "text-sm",
        "text-[#111827]",
    ] {
        assert!(classes.contains(&expected), "missing {expected} in {classes:?}");
    }
    assert_eq!(
        result.unsupported_props,
        vec!["letter-spacing: 0px;", "white-space: nowrap;"]
    );
}

#[tokio::test]
async fn test_wrapped_rule_fixture() {
    let result = convert_css(&read_fixture("wrapped-rule.css")).await;
    assert_eq!(
        result.output,
        "inline-flex items-center justify-center p-[8px_16px] cursor-pointer"
    );
    assert_eq!(result.unsupported_props, vec!["opacity: 1;"]);
}

#[tokio::test]
async fn test_unclosed_fixture_is_syntax_error() {
    let result = convert_css(&read_fixture("unclosed.css")).await;
    assert_eq!(result.status, Status::Error);
    assert_eq!(result.error.as_deref(), Some("Syntax Error"));
    assert_eq!(result.output, "");
}

#[test]
fn test_config_fixture() {
    let config = PipelineConfig::load(get_fixture_path("config.yaml")).unwrap();
    assert_eq!(config.debounce_ms, 150);
    assert_eq!(config.timeout_ms, 2000);
    assert_eq!(config.wrapper_selector, ".figma-paste");
}

// Default-value pruning
#[tokio::test]
async fn test_default_value_classes_never_emitted() {
    for input in [
        "opacity: 1;",
        "letter-spacing: 0;",
        "letter-spacing: 0px;",
        "letter-spacing: 0%;",
        "letter-spacing: normal;",
    ] {
        let result = convert_css(input).await;
        for class in [
            "opacity-100",
            "tracking-normal",
            "tracking-[0]",
            "tracking-[0px]",
            "tracking-[0%]",
        ] {
            assert!(
                !result.output.split_whitespace().any(|c| c == class),
                "{input} produced {class}"
            );
        }
    }
}

// Coverage
#[tokio::test]
async fn test_single_declarations_are_covered() {
    let declarations = [
        "display: flex;",
        "padding: 16px;",
        "margin: -8px;",
        "width: 100%;",
        "color: rgb(1, 2, 3);",
        "font-weight: 700;",
        "text-align: center;",
        "border-radius: 4px;",
        "z-index: 10;",
        "position: relative;",
        "background-color: #000;",
        "cursor: grab;",
        "opacity: 0.5;",
        "justify-content: space-between;",
        "align-items: center;",
        "gap: 8px;",
        "text-transform: uppercase;",
        "line-height: 1.5;",
        "letter-spacing: 2px;",
        "top: 4px;",
        "box-shadow: none;",
        "mix-blend-mode: multiply;",
        "order: 2;",
        "flex-direction: column;",
        "font-size: 18px;",
        "font-style: italic;",
        "text-decoration: underline;",
        "vertical-align: middle;",
        "align-self: flex-end;",
        "align-content: center;",
        "max-width: 640px;",
        "min-height: 100vh;",
        "border: 2px dashed red;",
    ];
    for declaration in declarations {
        let result = convert_css(declaration).await;
        assert_eq!(result.status, Status::Done, "{declaration}");
        assert!(
            result.unsupported_props.is_empty(),
            "{declaration} -> {:?} left {:?}",
            result.output,
            result.unsupported_props
        );
    }
}

#[tokio::test]
async fn test_uncovered_declaration_reported_verbatim() {
    let result = convert_css("white-space: nowrap;\ncolor: red;").await;
    assert_eq!(result.unsupported_props, vec!["white-space: nowrap;"]);
}

#[tokio::test]
async fn test_src_and_filter_never_reported() {
    let converter = FnConverter::new(|_css: String| async move {
        Ok::<_, ConvertError>(".temp-wrapper {\n  src: url(a.woff2);\n  filter: sepia(1);\n}".to_string())
    });
    let input = "src: url(a.woff2);\nfilter: sepia(1);";
    let result = run_pipeline(&converter, input, &PipelineConfig::default()).await;
    assert_eq!(result.output, "");
    assert!(result.unsupported_props.is_empty());
}

#[tokio::test]
async fn test_wrapper_is_transparent() {
    let bare = convert_css("color: red;").await;
    let wrapped = convert_css(".x { color: red; }").await;
    assert_eq!(bare.output, wrapped.output);
    assert_eq!(bare.unsupported_props, wrapped.unsupported_props);
}

// Preprocessing
#[test]
fn test_pixel_normalization() {
    assert_eq!(fix_figma_css("margin-top: 10;"), ".temp-wrapper {\nmargin-top: 10px;\n}");
    assert_eq!(fix_figma_css("margin-top: 0;"), ".temp-wrapper {\nmargin-top: 0;\n}");
    assert_eq!(fix_figma_css("opacity: 5;"), ".temp-wrapper {\nopacity: 5;\n}");
}

// End to end
#[tokio::test]
async fn test_end_to_end_with_builtin_converter() {
    let input = "display: flex;\npadding: 16px;\ncolor: #ff0000;\ncursor: grab;";
    let result = convert_css(input).await;
    let covered = covered_properties(&result.output);
    for prop in ["display", "padding", "color", "cursor"] {
        assert!(covered.contains(prop), "{prop} not covered by {}", result.output);
    }
    assert!(result.unsupported_props.is_empty());
}

#[tokio::test]
async fn test_end_to_end_with_converter_lacking_cursor() {
    let converter = FnConverter::new(|_css: String| async move {
        Ok::<_, ConvertError>(
            ".temp-wrapper {\n  @apply flex p-4 text-[#ff0000];\n  cursor: grab;\n}".to_string(),
        )
    });
    let input = "display: flex;\npadding: 16px;\ncolor: #ff0000;\ncursor: grab;";
    let result = run_pipeline(&converter, input, &PipelineConfig::default()).await;
    assert_eq!(result.output, "flex p-4 text-[#ff0000]");
    assert_eq!(result.unsupported_props, vec!["cursor: grab;"]);
}

#[tokio::test]
async fn test_throwing_converter_is_error() {
    let converter = FnConverter::new(|_css: String| async move {
        Err::<String, _>(ConvertError::Transport("worker crashed".into()))
    });
    let result = run_pipeline(&converter, ".a { color: red;", &PipelineConfig::default()).await;
    assert_eq!(result.status, Status::Error);
    assert_eq!(result.output, "");
    assert_eq!(result.error.as_deref(), Some("Server Error"));
}

// Session
#[tokio::test]
async fn test_session_with_fixture_config() {
    let config = PipelineConfig::load(get_fixture_path("config.yaml")).unwrap();
    let session = ConversionSession::new(RuleConverter::new(), config);

    session.set_input(read_fixture("wrapped-rule.css"));
    assert_eq!(session.state().status, Status::Typing);
    let state = session.wait_settled().await;
    assert_eq!(state.status, Status::Done);
    assert_eq!(state.unsupported_props, vec!["opacity: 1;"]);

    session.set_input("");
    assert_eq!(session.state().status, Status::Idle);
}
