//! 可嵌入作业的互动工具目录 - 业务能力层

use phf::phf_ordered_map;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::infrastructure::TextGenerator;
use crate::models::subject::Subject;
use crate::services::prompt_builder;

/// 工具名称 → 嵌入地址，保持展示顺序
pub static STEM_TOOLS: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "PhET: Balancing Chemical Equations" => "https://phet.colorado.edu/sims/html/balancing-chemical-equations/latest/balancing-chemical-equations_en.html",
    "PhET: Circuit Construction Kit" => "https://phet.colorado.edu/sims/html/circuit-construction-kit-dc/latest/circuit-construction-kit-dc_en.html",
    "PhET: Energy Skate Park" => "https://phet.colorado.edu/sims/html/energy-skate-park/latest/energy-skate-park_en.html",
    "PhET: Natural Selection" => "https://phet.colorado.edu/sims/html/natural-selection/latest/natural-selection_en.html",
    "PhET: Projectile Motion" => "https://phet.colorado.edu/sims/html/projectile-motion/latest/projectile-motion_en.html",
    "PhET: Forces and Motion" => "https://phet.colorado.edu/sims/html/forces-and-motion-basics/latest/forces-and-motion-basics_en.html",
    "Desmos: Graphing Calculator" => "https://www.desmos.com/calculator",
    "Desmos: Scientific Calculator" => "https://www.desmos.com/scientific",
    "GeoGebra: Geometry" => "https://www.geogebra.org/geometry",
    "YouTube: Crash Course" => "https://www.youtube.com/user/crashcourse",
    "YouTube: Khan Academy" => "https://www.youtube.com/user/khanacademy",
    "YouTube: National Geographic" => "https://www.youtube.com/user/NationalGeographic",
    "Wikipedia" => "https://www.wikipedia.org/",
    "Google Slides" => "https://docs.google.com/presentation/u/0/",
    "Canva" => "https://www.canva.com/",
    "Desmos: Supply & Demand Shifters" => "https://www.desmos.com/calculator/6mmm8psho7",
    "EconGraphs: Competitive Market" => "https://www.econgraphs.org/graphs/micro/equilibrium/supply_and_demand_old",
    "Marginal Revolution: Elasticity Practice" => "https://practice.mru.org/interactive-practice-supply-and-demand/",
    "Omni Margin Calculator" => "https://www.omnicalculator.com/finance/margin",
    "AutoDraw" => "https://www.autodraw.com/",
    "Sketchpad" => "https://sketch.io/sketchpad/",
    "Color Wheel" => "https://color.adobe.com/create/color-wheel",
    "Google Arts & Culture" => "https://artsandculture.google.com/",
    "Python Online Compiler" => "https://trinket.io/embed/python3",
    "Scratch" => "https://scratch.mit.edu/projects/editor/embed",
};

/// 各学科都可用的通用工具
const GENERAL_TOOLS: [&str; 4] = ["YouTube: Khan Academy", "Wikipedia", "Google Slides", "Canva"];

/// 查找工具地址
pub fn tool_url(name: &str) -> Option<&'static str> {
    STEM_TOOLS.get(name).copied()
}

/// 某学科可选的工具，按目录顺序
pub fn tools_for_subject(subject: Subject) -> Vec<&'static str> {
    let names = STEM_TOOLS.keys().copied();
    match subject {
        Subject::Science => names
            .filter(|k| {
                k.contains("PhET")
                    || k.contains("National Geographic")
                    || *k == "YouTube: Crash Course"
                    || GENERAL_TOOLS.contains(k)
            })
            .collect(),
        Subject::Math => names
            .filter(|k| k.contains("Desmos") || k.contains("GeoGebra") || GENERAL_TOOLS.contains(k))
            .collect(),
        Subject::BusinessEconomics => vec![
            "Desmos: Supply & Demand Shifters",
            "EconGraphs: Competitive Market",
            "Marginal Revolution: Elasticity Practice",
            "Omni Margin Calculator",
        ],
        Subject::HumanitiesArts => vec!["AutoDraw", "Sketchpad", "Color Wheel", "Google Arts & Culture"],
        Subject::TechnologyCs => vec!["Python Online Compiler", "Scratch"],
        Subject::English | Subject::General => names.collect(),
    }
}

/// 让模型从目录中挑选一个工具
///
/// 只有返回值恰好是目录中的名称时才采纳，其余情况（包括 "None"）返回 `None`
pub async fn recommend_tool(
    generator: &dyn TextGenerator,
    topic: &str,
    standard: &str,
) -> AppResult<Option<&'static str>> {
    let options: Vec<&str> = STEM_TOOLS.keys().copied().collect();
    let prompt = prompt_builder::tool_recommendation_prompt(topic, standard, &options);

    let answer = generator.generate(&prompt, false).await?;
    let answer = answer.trim().trim_matches('"');

    match STEM_TOOLS.get_entry(answer) {
        Some((name, _)) => {
            debug!("推荐工具: {}", name);
            Ok(Some(*name))
        }
        None => {
            if answer != "None" {
                warn!("模型推荐的工具不在目录中: {}", answer);
            }
            Ok(None)
        }
    }
}
