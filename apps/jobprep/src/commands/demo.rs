//! Smoke test of the integration steps on small inline fixtures.

use anyhow::Result;
use clap::Args;

use super::format_columns;
use crate::config::Config;
use crate::dataset::bundle::DatasetBundle;
use crate::dataset::loader::{read_postings, read_recommendations, read_salaries};
use crate::integration::pipeline::{integrate, IntegrationOptions};
use crate::integration::skills::JaccardSimilarity;

const PRIMARY_FIXTURE: &str = "\
User_ID,Job_ID,Match_Score,Recommended,User_Skills,Job_Requirements
1,16,0.82,1,\"Python, SQL, Data Science\",\"SQL, CSS, AI, JavaScript, Data Science\"
1,30,0.64,0,\"Python, SQL, Data Science\",\"AI, Data Science, SQL, Python, CSS\"
1,157,0.31,0,\"Python, SQL, Data Science\",\"Java, JavaScript, SQL\"
";

const POSTINGS_FIXTURE: &str = "\
job_id,job_title,company_name,location,job_requirements
16,Data Scientist,Tech Corp,Tokyo,\"SQL, Python, JavaScript, Data Science\"
30,AI Engineer,AI Solutions,Osaka,\"AI, Python, Data Science\"
157,Full Stack Developer,Web Startup,Remote,\"Java, JavaScript, SQL, React\"
200,Machine Learning Engineer,ML Company,Kyoto,\"Python, Machine Learning, TensorFlow\"
";

const SALARY_FIXTURE: &str = "\
job_title,salary_in_usd
Data Scientist,90000
Data Scientist,100000
AI Engineer,105000
Full Stack Developer,85000
";

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Minimum skill similarity for the skill-matching step
    #[arg(long, default_value_t = 0.5)]
    pub tolerance: f64,
}

pub fn run(args: DemoArgs, _config: &Config) -> Result<()> {
    print!("{}", render(args.tolerance)?);
    Ok(())
}

fn fixture_bundle() -> Result<DatasetBundle> {
    Ok(DatasetBundle::builder()
        .primary(read_recommendations(PRIMARY_FIXTURE.as_bytes())?)
        .postings(Some(read_postings(POSTINGS_FIXTURE.as_bytes())?))
        .salaries(Some(read_salaries(SALARY_FIXTURE.as_bytes())?))
        .build()?)
}

fn render(tolerance: f64) -> Result<String> {
    let bundle = fixture_bundle()?;
    let total = bundle.primary().len();
    let mut out = String::new();

    out.push_str("Fixtures\n");
    out.push_str(&format!("  primary rows: {total}\n"));
    out.push_str(&format!(
        "  postings:     {}\n",
        bundle.postings().map_or(0, |p| p.len())
    ));
    out.push_str(&format!(
        "  salary rows:  {}\n",
        bundle.salaries().map_or(0, |s| s.len())
    ));

    // Step 1: direct id join
    let id_options = IntegrationOptions {
        use_skill_matching: false,
        fallback_to_id_match: true,
        tolerance,
    };
    let by_id = integrate(&bundle, &id_options)?;
    let id_table = by_id.to_table();
    out.push_str(&format!(
        "\nId match: {}/{total} rows matched\n",
        id_table.non_null_count("job_title")
    ));
    out.push_str(&format_columns(
        &id_table,
        &["Job_ID", "job_title", "company_name", "location"],
    ));

    // Step 2: skill similarity
    let matches = bundle.skill_matches(tolerance, &JaccardSimilarity)?;
    let best = matches.best_matches();
    out.push_str(&format!(
        "\nSkill match (tolerance {tolerance}): {}/{} jobs matched\n",
        best.len(),
        bundle.primary().unique_jobs()
    ));
    for (job_id, candidates) in matches.iter() {
        let listed: Vec<String> = candidates
            .iter()
            .map(|c| format!("{} ({:.3})", c.posting_id, c.similarity))
            .collect();
        if let Some(winner) = best.get(&job_id) {
            out.push_str(&format!(
                "  {job_id} -> {} [candidates: {}]\n",
                winner.posting_id,
                listed.join(", ")
            ));
        }
    }

    let by_skill = integrate(
        &bundle,
        &IntegrationOptions {
            use_skill_matching: true,
            ..id_options
        },
    )?;
    out.push_str(&format_columns(
        &by_skill.to_table(),
        &["Job_ID", "skill_similarity", "job_id", "job_title"],
    ));

    // Step 3: salary enrichment on the id join
    out.push_str(&format!(
        "\nSalary enrichment: {}/{} rows matched\n",
        by_id.salary_matched(),
        by_id.len()
    ));
    out.push_str(&format_columns(
        &id_table,
        &[
            "Job_ID",
            "job_title",
            "company_name",
            "avg_salary_usd",
            "median_salary_usd",
            "salary_data_count",
        ],
    ));
    Ok(out)
}
