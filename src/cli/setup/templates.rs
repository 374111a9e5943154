//! Files written by `devcrew setup`

pub const ENV_FILE: &str = r#"# devcrew configuration
# Local Ollama configuration
OLLAMA_BASE_URL=http://localhost:11434
DEFAULT_LLM_MODEL=llama3.2:3b
CODE_LLM_MODEL=codellama:7b
ANALYSIS_LLM_MODEL=mistral:7b

# Project settings
OUTPUT_DIR=./output
VERBOSE=false

# Optional: opt-in pipeline policies
# DEVCREW_PIPELINE__MAX_ATTEMPTS=2
# DEVCREW_PIPELINE__CONTINUE_ON_FAILURE=true

# Optional: rolling log files
# DEVCREW_LOG_DIR=./logs
"#;

pub const README: &str = r#"# AI Development Team - Quick Start Guide

## Prerequisites
- devcrew installed (`cargo install --path .` from the devcrew repository)
- Ollama installed and running
- Git installed

## Quick Setup
1. Check the environment:
   ```bash
   devcrew doctor
   ```

2. Start your first project:
   ```bash
   devcrew run "Your project description here"
   ```

## Available Commands

### Full Development Workflow
```bash
devcrew run "Create a web application for..."
```

### Custom Workflow
```bash
devcrew run --custom
```

### Team and Tasks
```bash
devcrew list
```

### Environment Variables
Edit `.env` to customize:
- `DEFAULT_LLM_MODEL`: Default language model
- `CODE_LLM_MODEL`: Model for code-related tasks
- `ANALYSIS_LLM_MODEL`: Model for analysis personas
- `OLLAMA_BASE_URL`: Ollama server URL
- `OUTPUT_DIR`: Where the documents are written

Edit `config/crew.toml` and pass `--crew config/crew.toml` to change personas or tasks.

## Team Members

### Core Development Team
- **Senior Developer**: Code architecture and best practices
- **Frontend Developer**: User interface and client-side development
- **Backend Developer**: Server-side logic and APIs
- **DevOps Engineer**: Infrastructure and deployment
- **QA Engineer**: Testing and quality assurance

### Specialized Roles
- **Tech Lead**: Technical leadership and coordination
- **Business Analyst**: Requirements analysis and documentation
- **Security Specialist**: Security assessment and implementation
- **Database Administrator**: Database design and optimization
- **UI/UX Designer**: User experience and interface design

## Output Files
All results are saved in the `output/` directory:
- `project_analysis.md`: Business requirements and analysis
- `architecture_design.md`: System architecture and design
- `backend_implementation.md`: Backend development plan
- `frontend_implementation.md`: Frontend development plan
- `database_design.md`: Database schema and design
- `security_assessment.md`: Security analysis and recommendations
- `testing_strategy.md`: Testing plan and procedures
- `devops_setup.md`: Infrastructure and deployment guide
- `ux_design.md`: User experience design
- `code_review.md`: Code quality and review guidelines

## Tips for Best Results
1. **Be Specific**: Provide detailed project descriptions
2. **Include Context**: Mention target audience, scale, and constraints
3. **Specify Technology**: If you have preferences, include them
4. **Define Scope**: Clearly outline what you want to build

## Troubleshooting

### Ollama Issues
- Ensure Ollama is running: `ollama serve`
- Check available models: `ollama list`
- Pull required models: `ollama pull llama3.2:3b`

### Performance Tips
- Use smaller models for faster responses (`--model llama3.2:3b`)
- Limit the number of agents for simple projects
- Use custom workflows for specific needs
- Retry flaky steps with `--retries 1`
"#;

pub const WEB_APPLICATION: &str = r#"# Web Application Development Example

## Usage
```bash
devcrew run "Create a modern web application for task management with user authentication, real-time updates, and mobile responsiveness. Include features like project creation, task assignment, progress tracking, and team collaboration tools."
```

## Expected Output
- Project analysis and requirements
- System architecture design
- Backend API implementation plan
- Frontend application design
- Database schema
- Security assessment
- Testing strategy
- DevOps setup guide
- UI/UX design recommendations
- Code review guidelines

## Agents Involved
All ten personas, in the default task order.
"#;

pub const API_DEVELOPMENT: &str = r#"# REST API Development Example

## Usage
```bash
devcrew run --custom \
  --agents backend_developer,database_admin,security_specialist,qa_engineer \
  --tasks analyze_project,design_architecture,develop_backend,design_database,assess_security,create_testing_strategy \
  "Develop a RESTful API for an e-commerce platform with product catalog, user management, order processing, payment integration, and inventory management."
```

## Expected Output
- API architecture and design
- Database schema for e-commerce
- Backend implementation plan
- Security measures and authentication
- Testing strategy for APIs
"#;

pub const MOBILE_APPLICATION: &str = r#"# Mobile Application Development Example

## Usage
```bash
devcrew run "Design and develop a cross-platform mobile application for fitness tracking with features like workout logging, progress visualization, social sharing, and integration with wearable devices."
```

## Focus Areas
- Cross-platform development strategy
- Mobile UI/UX design principles
- Backend API for mobile clients
- Data synchronization and offline support
- Performance optimization
- Security for mobile applications
- Testing on multiple devices
- App store deployment strategy
"#;

pub const START_SCRIPT: &str = r#"#!/bin/bash

# devcrew startup script

echo "🤖 AI Development Team - Startup Script"
echo "======================================"

if ! command -v devcrew > /dev/null; then
    echo "❌ devcrew is not on PATH"
    exit 1
fi

# Start Ollama if it is not running
if ! pgrep -x "ollama" > /dev/null; then
    echo "🚀 Starting Ollama..."
    ollama serve &
    sleep 5
fi

echo "🔍 Checking AI models..."
for model in llama3.2:3b codellama:7b mistral:7b; do
    if ! ollama list | grep -q "$model"; then
        echo "📥 Downloading $model model..."
        ollama pull "$model"
    fi
done

echo "✅ All models ready!"
echo ""

echo "🎯 Usage Options:"
echo "1. Full development workflow"
echo "2. Custom workflow"
echo "3. List agents and tasks"
echo ""

read -p "Choose an option (1/2/3) or press Enter to exit: " choice

case $choice in
    1)
        read -p "Enter your project description: " project_desc
        devcrew run "$project_desc"
        ;;
    2)
        devcrew run --custom
        ;;
    3)
        devcrew list
        ;;
    *)
        echo "👋 Goodbye!"
        ;;
esac
"#;
